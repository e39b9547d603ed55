//! HTTP transport abstraction and the default hyper-based implementation.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::{Error, Request, Response, Result, TransportConfig};

/// Capability to send one HTTP request and return a buffered response.
///
/// The dispatcher owns nothing transport-shaped: timeouts, TLS, pooling, and
/// cancellation all belong to the implementation behind this trait. An
/// implementation must be safe for concurrent use from multiple tasks.
pub trait Transport: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Implementations must read the response body to completion before
    /// returning, on every path, so no connection is left half-drained.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

type PooledClient = hyper_util::client::legacy::Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// Default [`Transport`] backed by a pooled hyper-util client with rustls TLS.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use untappd::{HyperTransport, TransportConfig};
///
/// let config = TransportConfig::builder()
///     .timeout(Duration::from_secs(10))
///     .build();
/// let transport = HyperTransport::with_config(config);
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: PooledClient,
    config: TransportConfig,
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let inner = hyper_util::client::legacy::Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(&config));

        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Transport for HyperTransport {
    async fn execute(&self, request: Request) -> Result<Response<Bytes>> {
        let hyper_request = build_hyper_request(request)?;

        let response = tokio::time::timeout(self.config.timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = extract_headers(response.headers());

        // Collecting drains the body so the connection can return to the pool
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }
}

/// Build a bodyless hyper request from an API request.
fn build_hyper_request(request: Request) -> Result<http::Request<Empty<Bytes>>> {
    let (method, url, headers) = request.into_parts();

    let mut builder = http::Request::builder()
        .method(http::Method::from(method))
        .uri(url.as_str());

    for (name, value) in &headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Empty::new())
        .map_err(|e| Error::invalid_request(e.to_string()))
}

/// Extract response headers as a `HashMap`, skipping non-UTF-8 values.
fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

#[allow(clippy::needless_pass_by_value)]
fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
    let msg = err.to_string();

    if err.is_connect() {
        return Error::connection(msg);
    }

    if msg.contains("tls") || msg.contains("certificate") {
        return Error::tls(msg);
    }

    Error::connection(msg)
}

/// HTTPS connector with rustls and the Mozilla root certificates.
fn https_connector(config: &TransportConfig) -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(config.connect_timeout));

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http)
}

#[cfg(test)]
mod tests {
    use crate::Method;

    use super::*;

    #[test]
    fn transport_default() {
        let transport = HyperTransport::new();
        assert_eq!(
            transport.config().timeout,
            std::time::Duration::from_secs(30)
        );
    }

    #[test]
    fn transport_is_clone_and_debug() {
        let transport = HyperTransport::new();
        let _cloned = transport.clone();
        let debug = format!("{transport:?}");
        assert!(debug.contains("HyperTransport"));
    }

    #[test]
    fn builds_bodyless_request_with_headers() {
        let url = url::Url::parse("https://api.untappd.com/v4/beer/info/1/").expect("valid URL");
        let request = Request::builder(Method::Get, url)
            .header("Accept", "application/json")
            .build();

        let hyper_request = build_hyper_request(request).expect("request");
        assert_eq!(hyper_request.method(), http::Method::GET);
        assert_eq!(
            hyper_request.uri().to_string(),
            "https://api.untappd.com/v4/beer/info/1/"
        );
        assert_eq!(
            hyper_request
                .headers()
                .get("Accept")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
