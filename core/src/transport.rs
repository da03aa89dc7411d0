//! The I/O seam between the client and the network.
//!
//! # Design
//! `CalendlyClient` never talks to a socket itself. It hands an
//! [`HttpRequest`] to a [`Transport`] and decodes whatever comes back. The
//! contract mirrors what a generic HTTP library offers: a response for 2xx,
//! a `Status` error that still carries the response for anything else, and a
//! `Network` error when no response was received.
//!
//! [`UreqTransport`] is the default implementation. Tests inject their own.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {}", .0.status)]
    Status(HttpResponse),

    /// No response was received.
    #[error("{message}")]
    Network { message: String, code: Option<u16> },
}

/// Executes one HTTP round-trip.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
///
/// Every request gets `Authorization: Bearer <token>`, `Accept` and
/// `User-Agent` headers. ureq's status-as-error behavior is disabled so 4xx
/// and 5xx bodies stay readable and are returned as `TransportError::Status`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self {
            agent,
            base_url: config.base_url().to_string(),
            authorization: format!("Bearer {}", config.token()),
            user_agent: config.user_agent().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn decorate<B>(&self, mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
        builder = builder
            .header("authorization", &self.authorization)
            .header("accept", "application/json")
            .header("user-agent", &self.user_agent);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (key, value) in &request.query {
            builder = builder.query(key.as_str(), value.as_str());
        }
        builder
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("base_url", &self.base_url)
            .field("authorization", &"Bearer <redacted>")
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = request.method.as_str(), %url, "sending request");

        let result = match request.method {
            HttpMethod::Get => self.decorate(self.agent.get(&url), request).call(),
            HttpMethod::Delete => self.decorate(self.agent.delete(&url), request).call(),
            HttpMethod::Post => {
                let builder = self.decorate(self.agent.post(&url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(network_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string().map_err(network_error)?;
        debug!(status, "received response");

        let response = HttpResponse { status, headers, body };
        if response.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status(response))
        }
    }
}

fn network_error(err: ureq::Error) -> TransportError {
    let code = match &err {
        ureq::Error::StatusCode(status) => Some(*status),
        _ => None,
    };
    TransportError::Network {
        message: err.to_string(),
        code,
    }
}
