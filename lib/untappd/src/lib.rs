//! Typed client for the Untappd APIv4.
//!
//! The crate covers the request/response pipeline: authenticated URL
//! construction, content-type and status validation, JSON decoding into
//! caller-supplied destination types, and normalization of the APIv4 error
//! envelope (including its unit-tagged `response_time`) into [`ApiError`].
//!
//! Endpoint wrappers stay out of scope by design; they are thin callers of
//! [`Client::request`].
//!
//! # Example
//!
//! ```no_run
//! use serde::Deserialize;
//! use untappd::{Client, Method};
//!
//! #[derive(Debug, Deserialize)]
//! struct UserEnvelope {
//!     response: serde_json::Value,
//! }
//!
//! # async fn run() -> untappd::Result<()> {
//! let client = Client::new("my-client-id", "my-client-secret")?;
//!
//! let user: UserEnvelope = client
//!     .request(Method::Get, "user/info/gregavola", &[("compact", "true")])
//!     .await?;
//! println!("{user:?}");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod meta;
mod method;
mod request;
mod response;
mod transport;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use config::{TransportConfig, TransportConfigBuilder};
pub use error::{ApiError, Error, Result};
pub use meta::{JSON_MEDIA_TYPE, ResponseTime, validate};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::{Response, from_json};
pub use transport::{HyperTransport, Transport};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
