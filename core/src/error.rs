//! Error types for the Calendly client.
//!
//! # Design
//! Every failure on the dispatch path is normalized into `Error::Api`, which
//! carries a human-readable message and a numeric status: the HTTP status
//! when a response arrived, 500 for bodies that could not be decoded, and
//! the transport's code (or 0) when no response arrived at all.
//! `Error::Validation` is raised locally before any request is sent.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Status reported for bodies that claim JSON but fail to parse.
pub const INVALID_JSON_STATUS: u16 = 500;

#[derive(Debug, Error)]
pub enum Error {
    /// A request reached the dispatch path and failed.
    #[error("{message}")]
    Api { message: String, status: u16 },

    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl Error {
    pub fn api(message: impl Into<String>, status: u16) -> Self {
        Error::Api {
            message: message.into(),
            status,
        }
    }

    pub(crate) fn invalid_json(err: &serde_json::Error) -> Self {
        Error::api(format!("Invalid JSON: {err}"), INVALID_JSON_STATUS)
    }

    /// Status code of an `Api` error; `None` for validation failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Validation(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_its_message() {
        let err = Error::api("Resource Not Found", 404);
        assert_eq!(err.to_string(), "Resource Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn validation_error_has_no_status() {
        let err = Error::Validation("bad events".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalid_json_is_reported_as_500() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::invalid_json(&parse_err);
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().starts_with("Invalid JSON: "));
    }
}
