//! Typed operations against the Calendly webhook and user endpoints.
//!
//! # Design
//! Each operation is split in two, like the transport seam suggests: a
//! `build_*` method that produces an [`HttpRequest`] without touching the
//! network, and an executing method that sends it through the client's
//! [`Transport`] and runs the result through [`decode_response`]. Hosts that
//! do their own I/O can use the builders and the `decode` module directly.
//!
//! The client holds nothing but its transport, so one instance can be shared
//! across threads whenever the transport allows it.

use tracing::debug;

use crate::config::Config;
use crate::decode::{decode_delete, decode_response};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};
use crate::types::{to_params, CreateWebhook, Payload, WebhookEvent, WebhookQuery, WebhookScope};

const WEBHOOK_SUBSCRIPTIONS: &str = "webhook_subscriptions";

/// Client for the Calendly v2 API.
#[derive(Debug, Clone)]
pub struct CalendlyClient<T = UreqTransport> {
    transport: T,
}

impl CalendlyClient<UreqTransport> {
    /// Client for the public API authenticated with a personal access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_config(Config::new(token))
    }

    pub fn from_config(config: Config) -> Self {
        Self::with_transport(UreqTransport::new(&config))
    }
}

impl<T: Transport> CalendlyClient<T> {
    /// Client that sends every request through `transport`. The transport is
    /// responsible for the base URL and the `Authorization` header.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for [`create_webhook`](Self::create_webhook).
    ///
    /// Fails with `Error::Validation` if any event is not a known
    /// [`WebhookEvent`].
    pub fn build_create_webhook<S: AsRef<str>>(
        &self,
        url: &str,
        events: &[S],
        organization_url: &str,
        user_url: &str,
    ) -> Result<HttpRequest> {
        let events = events
            .iter()
            .map(|event| event.as_ref().parse::<WebhookEvent>())
            .collect::<Result<Vec<_>>>()?;
        let body = CreateWebhook {
            url: url.to_string(),
            events,
            organization: organization_url.to_string(),
            user: user_url.to_string(),
            scope: WebhookScope::User,
        };
        Ok(HttpRequest::new(HttpMethod::Post, WEBHOOK_SUBSCRIPTIONS).with_params(to_params(&body)?))
    }

    pub fn build_get_webhook(&self, id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, &webhook_path(id))
    }

    pub fn build_get_webhooks(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, WEBHOOK_SUBSCRIPTIONS)
    }

    pub fn build_list_webhooks(&self, query: &WebhookQuery) -> Result<HttpRequest> {
        Ok(HttpRequest::new(HttpMethod::Get, WEBHOOK_SUBSCRIPTIONS).with_params(to_params(query)?))
    }

    pub fn build_get_current_user(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, "users/me")
    }

    pub fn build_delete_webhook(&self, id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, &webhook_path(id))
    }

    pub fn build_echo(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, "echo")
    }

    /// Subscribe `url` to `events` for one user of an organization.
    ///
    /// Events are validated before anything is sent; an unknown event name
    /// returns `Error::Validation` and no request is made.
    pub fn create_webhook<S: AsRef<str>>(
        &self,
        url: &str,
        events: &[S],
        organization_url: &str,
        user_url: &str,
    ) -> Result<Payload> {
        let request = self.build_create_webhook(url, events, organization_url, user_url)?;
        self.call_api(&request)
    }

    pub fn get_webhook(&self, id: &str) -> Result<Payload> {
        self.call_api(&self.build_get_webhook(id))
    }

    /// All webhook subscriptions visible to the token, with pagination metadata.
    pub fn get_webhooks(&self) -> Result<Payload> {
        self.call_api(&self.build_get_webhooks())
    }

    pub fn list_webhooks(&self, query: &WebhookQuery) -> Result<Payload> {
        self.call_api(&self.build_list_webhooks(query)?)
    }

    pub fn get_current_user(&self) -> Result<Payload> {
        self.call_api(&self.build_get_current_user())
    }

    /// Delete a webhook subscription. Deleting one that does not exist
    /// succeeds.
    pub fn delete_webhook(&self, id: &str) -> Result<()> {
        let request = self.build_delete_webhook(id);
        debug!(method = request.method.as_str(), path = %request.path, "calling Calendly API");
        decode_delete(self.transport.send(&request))
    }

    /// Round-trip to `/echo`, useful to check connectivity and the token.
    pub fn echo(&self) -> Result<Payload> {
        self.call_api(&self.build_echo())
    }

    fn call_api(&self, request: &HttpRequest) -> Result<Payload> {
        debug!(method = request.method.as_str(), path = %request.path, "calling Calendly API");
        decode_response(self.transport.send(request))
    }
}

/// `webhook_subscriptions/{id}` with `id` encoded as a single path segment.
fn webhook_path(id: &str) -> String {
    format!("{WEBHOOK_SUBSCRIPTIONS}/{}", urlencoding::encode(id))
}
