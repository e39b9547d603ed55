//! Response validation and the APIv4 error envelope.
//!
//! Every failed call comes back wrapped in a `meta` object carrying the
//! status code, error strings, and a `{time, measure}` pair describing how
//! long the remote side says the call took. [`validate`] turns that envelope
//! into an [`ApiError`]; [`ResponseTime`] handles the duration pair.

use std::time::Duration;

use bytes::Bytes;
use http::header;
use serde::{Deserialize, Deserializer};

use crate::{ApiError, Error, Response, Result, from_json};

/// The content type the APIv4 speaks, on both sides of the wire.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Server-reported call duration, self-decoding from the APIv4 shape
/// `{"time": <number>, "measure": <unit>}`.
///
/// The unit vocabulary is fixed to `milliseconds`, `seconds`, and `minutes`.
/// Anything else decodes to [`Duration::ZERO`], as does a magnitude that
/// cannot form a valid duration. A zero value therefore means "unknown or
/// unspecified", not "instantaneous".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTime(Duration);

impl ResponseTime {
    /// The decoded duration.
    #[must_use]
    pub const fn duration(self) -> Duration {
        self.0
    }
}

impl From<ResponseTime> for Duration {
    fn from(response_time: ResponseTime) -> Self {
        response_time.0
    }
}

impl<'de> Deserialize<'de> for ResponseTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            time: f64,
            measure: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self(unit_duration(raw.time, &raw.measure)))
    }
}

/// Combine a magnitude and an APIv4 measure name into a duration.
fn unit_duration(magnitude: f64, measure: &str) -> Duration {
    // Known measure names mapped to their length in seconds
    let unit_secs = match measure {
        "milliseconds" => 1e-3,
        "seconds" => 1.0,
        "minutes" => 60.0,
        _ => return Duration::ZERO,
    };

    Duration::try_from_secs_f64(magnitude * unit_secs).unwrap_or(Duration::ZERO)
}

/// Intermediary form of the APIv4 error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) meta: ErrorMeta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMeta {
    pub(crate) code: u16,
    #[serde(default)]
    pub(crate) error_detail: String,
    #[serde(default)]
    pub(crate) error_type: String,
    #[serde(default)]
    pub(crate) developer_friendly: Option<String>,
    #[serde(default)]
    pub(crate) response_time: ResponseTime,
}

impl From<ErrorMeta> for ApiError {
    fn from(meta: ErrorMeta) -> Self {
        Self {
            code: meta.code,
            error_type: meta.error_type,
            detail: meta.error_detail,
            developer_friendly: meta.developer_friendly,
            response_time: meta.response_time.duration(),
        }
    }
}

/// Validate an API response.
///
/// The content type is checked first, unconditionally. A status in
/// `[200, 299]` then passes; anything else has its body decoded as an error
/// envelope and surfaces as [`Error::Api`].
///
/// # Errors
///
/// - [`Error::UnexpectedContentType`] if the response declares anything other
///   than `application/json`, even on success statuses.
/// - [`Error::Json`] if a non-success body is missing, truncated, or
///   malformed; the raw [`serde_json::Error`] stays reachable so an empty body
///   and a partial one remain distinguishable.
/// - [`Error::Api`] for a well-formed error envelope.
pub fn validate(response: &Response<Bytes>) -> Result<()> {
    let content_type = response
        .header(header::CONTENT_TYPE.as_str())
        .unwrap_or_default();
    if content_type != JSON_MEDIA_TYPE {
        return Err(Error::UnexpectedContentType {
            expected: JSON_MEDIA_TYPE,
            actual: content_type.to_owned(),
        });
    }

    if response.is_success() {
        return Ok(());
    }

    let envelope: ErrorEnvelope = from_json(response.body())?;
    Err(Error::Api(envelope.meta.into()))
}
