//! Synchronous client for the Calendly v2 API: webhook subscriptions, the
//! current user, and the `/echo` connectivity check.
//!
//! # Overview
//! `CalendlyClient` turns each operation into an [`HttpRequest`], sends it
//! through a [`Transport`] and decodes the outcome into a [`Payload`] or an
//! [`Error`]. The default [`UreqTransport`] targets `https://api.calendly.com`
//! and attaches `Authorization: Bearer <token>` to every request.
//!
//! # Design
//! - Request building and response decoding never touch the network; only
//!   the transport does I/O, so both halves are testable on plain data.
//! - All failures are normalized in [`decode`] into `Error::Api` with a
//!   message and status code. Unknown event kinds are rejected locally with
//!   `Error::Validation`.
//! - Deleting a webhook that is already gone succeeds.
//! - The library logs through `tracing` and installs no subscriber.
//!
//! ```no_run
//! use calendly_core::CalendlyClient;
//!
//! let client = CalendlyClient::new("personal-access-token");
//! let user = client.get_current_user()?.into_object()?;
//! println!("{}", user["resource"]["uri"]);
//! # Ok::<(), calendly_core::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::CalendlyClient;
pub use config::{Config, API_URL};
pub use decode::{decode_delete, decode_response};
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{CreateWebhook, Payload, WebhookEvent, WebhookQuery, WebhookScope};
