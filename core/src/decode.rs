//! Response decoding and error normalization.
//!
//! # Design
//! This is the one place that interprets what came back from a transport.
//! Success bodies labelled `application/json` are parsed; anything else is
//! returned as raw text. Failures are folded into `Error::Api`:
//!
//! - a response with an error status keeps its status code, and its message
//!   is the `message` field of a JSON body or the raw body otherwise;
//! - no response at all becomes `"Failed to get Calendly data: ..."` with the
//!   transport's code, or 0;
//! - a body that claims JSON but does not parse becomes `"Invalid JSON: ..."`
//!   with status 500, whether it was a success or an error body.
//!
//! The functions are public so hosts that execute requests themselves can
//! apply the same policy.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::http::HttpResponse;
use crate::transport::TransportError;
use crate::types::Payload;

/// Prefix of the message produced when no response was received.
pub const NETWORK_ERROR_PREFIX: &str = "Failed to get Calendly data: ";

/// Decode the outcome of one round-trip into a payload or a normalized error.
pub fn decode_response(result: std::result::Result<HttpResponse, TransportError>) -> Result<Payload> {
    let decoded = match result {
        Ok(response) if response.is_success() => decode_success(response),
        // Transports that return error statuses as plain responses get the
        // same treatment as `TransportError::Status`.
        Ok(response) | Err(TransportError::Status(response)) => Err(error_from_response(response)),
        Err(TransportError::Network { message, code }) => {
            Err(Error::api(format!("{NETWORK_ERROR_PREFIX}{message}"), code.unwrap_or(0)))
        }
    };
    if let Err(Error::Api { message, status }) = &decoded {
        warn!(status, %message, "Calendly API call failed");
    }
    decoded
}

/// Like [`decode_response`], but a 404 counts as success: the resource being
/// gone is the outcome a delete asks for.
pub fn decode_delete(result: std::result::Result<HttpResponse, TransportError>) -> Result<()> {
    match decode_response(result) {
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => {
            debug!("resource already absent, treating delete as done");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn decode_success(response: HttpResponse) -> Result<Payload> {
    if response.is_json() {
        parse_json(&response.body).map(Payload::Json)
    } else {
        Ok(Payload::Text(response.body))
    }
}

fn error_from_response(response: HttpResponse) -> Error {
    let status = response.status;
    if !response.is_json() {
        return Error::api(response.body, status);
    }
    match parse_json(&response.body) {
        Ok(value) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or(response.body);
            Error::api(message, status)
        }
        Err(err) => err,
    }
}

fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| Error::invalid_json(&e))
}
