//! HTTP request and response values exchanged with a [`Transport`].
//!
//! # Design
//! Requests and responses are plain data. The client builds an `HttpRequest`
//! whose `path` is relative to the API root (`/webhook_subscriptions`, ...);
//! the transport owns the base URL and credentials and turns the value into
//! a real round-trip. Keeping both sides as data lets hosts that do their own
//! I/O reuse the request builders and the decoding policy unchanged.
//!
//! [`Transport`]: crate::transport::Transport

use serde_json::{Map, Value};

/// Content type the API uses for both request and response bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path relative to the API root, always starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A request with no query, headers or body. A missing leading `/` is added.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: format!("/{}", path.trim_start_matches('/')),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a parameter mapping: query pairs for GET, a JSON body otherwise.
    ///
    /// An empty mapping leaves the request untouched, so a DELETE carries no
    /// body.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        if params.is_empty() {
            return self;
        }
        if self.method == HttpMethod::Get {
            for (key, value) in params {
                push_query_value(&mut self.query, &key, value);
            }
        } else {
            self.headers
                .push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
            self.body = Some(Value::Object(params).to_string());
        }
        self
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => query.push((key.to_string(), s)),
        Value::Array(items) => {
            for item in items {
                push_query_value(query, key, item);
            }
        }
        other => query.push((key.to_string(), other.to_string())),
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// True when the content type starts with `application/json`, parameters
    /// such as `; charset=utf-8` included.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with(JSON_CONTENT_TYPE))
            .unwrap_or(false)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn new_normalizes_leading_slash() {
        assert_eq!(HttpRequest::new(HttpMethod::Get, "echo").path, "/echo");
        assert_eq!(HttpRequest::new(HttpMethod::Get, "/echo").path, "/echo");
    }

    #[test]
    fn get_params_become_query_pairs() {
        let req = HttpRequest::new(HttpMethod::Get, "webhook_subscriptions")
            .with_params(params(json!({"scope": "user", "count": 10, "page_token": null})));
        assert_eq!(
            req.query,
            vec![
                ("count".to_string(), "10".to_string()),
                ("scope".to_string(), "user".to_string()),
            ]
        );
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn array_params_repeat_the_key() {
        let req = HttpRequest::new(HttpMethod::Get, "x").with_params(params(json!({"e": ["a", "b"]})));
        assert_eq!(
            req.query,
            vec![("e".to_string(), "a".to_string()), ("e".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn post_params_become_json_body() {
        let req = HttpRequest::new(HttpMethod::Post, "webhook_subscriptions")
            .with_params(params(json!({"url": "https://example.com"})));
        assert!(req.query.is_empty());
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"url": "https://example.com"}));
    }

    #[test]
    fn empty_params_leave_delete_without_body() {
        let req = HttpRequest::new(HttpMethod::Delete, "webhook_subscriptions/1").with_params(Map::new());
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn content_type_lookup_is_case_insensitive() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "Application/JSON; charset=utf-8".to_string())],
            body: "{}".to_string(),
        };
        assert_eq!(response.content_type(), Some("Application/JSON; charset=utf-8"));
        assert!(response.is_json());
    }

    #[test]
    fn missing_content_type_is_not_json() {
        let response = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(!response.is_json());
        assert!(response.is_success());
    }
}
