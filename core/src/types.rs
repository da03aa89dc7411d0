//! Domain types for the webhook and user endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Event kinds a webhook subscription can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "invitee.created")]
    InviteeCreated,
    #[serde(rename = "invitee.canceled")]
    InviteeCanceled,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 2] = [WebhookEvent::InviteeCreated, WebhookEvent::InviteeCanceled];

    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEvent::InviteeCreated => "invitee.created",
            WebhookEvent::InviteeCanceled => "invitee.canceled",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        WebhookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("The specified event types do not exist: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookScope {
    User,
    Organization,
}

/// Body of `POST /webhook_subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhook {
    pub url: String,
    pub events: Vec<WebhookEvent>,
    pub organization: String,
    pub user: String,
    pub scope: WebhookScope,
}

/// Filters for `GET /webhook_subscriptions`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<WebhookScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl WebhookQuery {
    /// All subscriptions of one user inside an organization.
    pub fn for_user(organization: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            organization: Some(organization.into()),
            user: Some(user.into()),
            scope: Some(WebhookScope::User),
            ..Self::default()
        }
    }
}

/// A decoded response body.
///
/// `Json` holds the parsed value exactly as the server sent it; `Text` holds
/// the raw body of any response that was not labelled `application/json`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// The top-level JSON object, or an `Api` error with status 500 when the
    /// body was text or a non-object JSON value.
    pub fn into_object(self) -> Result<Map<String, Value>> {
        match self {
            Payload::Json(Value::Object(map)) => Ok(map),
            Payload::Json(other) => Err(Error::api(
                format!("Expected a JSON object, got: {other}"),
                500,
            )),
            Payload::Text(text) => Err(Error::api(
                format!("Expected a JSON object, got text: {text}"),
                500,
            )),
        }
    }
}

/// Serialize `value` into a parameter mapping for `HttpRequest::with_params`.
pub(crate) fn to_params<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::Validation(format!(
            "request parameters must be an object, got: {other}"
        ))),
        Err(err) => Err(Error::Validation(format!("invalid request parameters: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn event_parses_from_wire_name() {
        assert_eq!("invitee.created".parse::<WebhookEvent>().unwrap(), WebhookEvent::InviteeCreated);
        assert_eq!("invitee.canceled".parse::<WebhookEvent>().unwrap(), WebhookEvent::InviteeCanceled);
    }

    #[test]
    fn unknown_event_is_a_validation_error() {
        for raw in ["invitee.updated", "Invitee.Created", "", "routing_form_submission.created"] {
            let err = raw.parse::<WebhookEvent>().unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn event_serializes_to_wire_name() {
        let value = serde_json::to_value(WebhookEvent::InviteeCanceled).unwrap();
        assert_eq!(value, json!("invitee.canceled"));
        assert_eq!(WebhookEvent::InviteeCreated.to_string(), "invitee.created");
    }

    #[test]
    fn create_webhook_serializes_all_five_fields() {
        let body = CreateWebhook {
            url: "https://example.com/hook".to_string(),
            events: vec![WebhookEvent::InviteeCreated],
            organization: "https://api.calendly.com/organizations/ORG".to_string(),
            user: "https://api.calendly.com/users/USR".to_string(),
            scope: WebhookScope::User,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "url": "https://example.com/hook",
                "events": ["invitee.created"],
                "organization": "https://api.calendly.com/organizations/ORG",
                "user": "https://api.calendly.com/users/USR",
                "scope": "user",
            })
        );
    }

    #[test]
    fn query_skips_unset_fields() {
        let params = to_params(&WebhookQuery {
            count: Some(5),
            ..WebhookQuery::default()
        })
        .unwrap();
        assert_eq!(Value::Object(params), json!({"count": 5}));
        assert!(to_params(&WebhookQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn for_user_sets_user_scope() {
        let query = WebhookQuery::for_user("org", "usr");
        assert_eq!(query.scope, Some(WebhookScope::User));
        assert_eq!(query.organization.as_deref(), Some("org"));
        assert_eq!(query.user.as_deref(), Some("usr"));
    }

    #[test]
    fn payload_into_object() {
        let map = Payload::Json(json!({"resource": {}})).into_object().unwrap();
        assert!(map.contains_key("resource"));

        let err = Payload::Json(json!([1, 2])).into_object().unwrap_err();
        assert_eq!(err.status(), Some(500));

        let err = Payload::Text("pong".to_string()).into_object().unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn payload_accessors() {
        let text = Payload::Text("ok".to_string());
        assert_eq!(text.as_text(), Some("ok"));
        assert!(text.as_json().is_none());

        let json = Payload::Json(json!({"a": 1}));
        assert_eq!(json.as_json().unwrap()["a"], 1);
        assert!(json.as_text().is_none());
        assert_eq!(json.into_json(), Some(json!({"a": 1})));
    }
}
