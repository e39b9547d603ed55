//! Error types for the Untappd client.

use std::fmt;
use std::time::Duration;

use derive_more::{Display, Error, From};

/// Main error type for Untappd API operations.
///
/// Every failure mode of a call stays its own variant: configuration problems
/// surface before any network activity, transport failures pass through
/// unclassified, and [`Error::Api`] is the only variant this crate constructs
/// from remote data.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// No client ID was configured.
    #[display("missing client ID")]
    MissingClientId,

    /// No client secret was configured.
    #[display("missing client secret")]
    MissingClientSecret,

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Network/connection errors, propagated from the transport.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors, propagated from the transport.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The transport gave up waiting for a response.
    #[display("request timeout")]
    Timeout,

    /// The request could not be assembled.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The response did not declare the expected content type.
    #[display("expected {expected} content type, but received {actual}")]
    #[from(skip)]
    UnexpectedContentType {
        /// Content type the API is expected to speak.
        expected: &'static str,
        /// Content type the response actually declared.
        actual: String,
    },

    /// A response body failed to decode as JSON.
    ///
    /// Raised both for error envelopes and for caller destination values.
    /// The untouched [`serde_json::Error`] is available via [`Error::as_json`].
    #[display("JSON decode error at '{path}': {source}")]
    #[from(skip)]
    Json {
        /// JSON path to the failure (e.g., `meta.response_time`).
        path: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },

    /// The API returned a well-formed error envelope.
    #[display("{_0}")]
    #[from]
    Api(ApiError),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub(crate) fn json_decode(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Json {
            path: err.path().to_string(),
            source: err.into_inner(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the API error if the remote side reported one.
    #[must_use]
    pub const fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Returns the status code carried by a remote API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api().map(|api| api.code)
    }

    /// Returns the preserved [`serde_json::Error`] of a decode failure.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Error> {
        match self {
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// An error returned by the Untappd APIv4 inside its `meta` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Status code reported in the envelope (mirrors the HTTP status).
    pub code: u16,
    /// Short machine-readable error category (e.g., `invalid_auth`).
    pub error_type: String,
    /// Human-readable error detail.
    pub detail: String,
    /// Alternate detail string aimed at API developers.
    pub developer_friendly: Option<String>,
    /// Server-reported call duration, [`Duration::ZERO`] when unspecified.
    pub response_time: Duration,
}

impl ApiError {
    /// The detail string to display.
    ///
    /// Per the APIv4 documentation, the "developer friendly" string is used in
    /// place of the regular detail wherever available.
    #[must_use]
    pub fn preferred_detail(&self) -> &str {
        self.developer_friendly
            .as_deref()
            .filter(|detail| !detail.is_empty())
            .unwrap_or(&self.detail)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.code,
            self.error_type,
            self.preferred_detail()
        )
    }
}

impl std::error::Error for ApiError {}
