//! The Untappd APIv4 client and its request dispatcher.

use std::fmt;

use bytes::Bytes;
use http::header;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    Error, HyperTransport, JSON_MEDIA_TYPE, Method, Request, Response, Result, Transport,
    from_json, validate,
};

/// API root every client starts from.
pub const DEFAULT_BASE_URL: &str = "https://api.untappd.com/v4/";

/// Query parameter carrying the API client ID.
const CLIENT_ID_PARAM: &str = "client_id";

/// Query parameter carrying the API client secret.
const CLIENT_SECRET_PARAM: &str = "client_secret";

/// Identification header value sent when none is configured.
const DEFAULT_USER_AGENT: &str = concat!("untappd-rs/", env!("CARGO_PKG_VERSION"));

/// Client for the Untappd APIv4.
///
/// A client is immutable once built and cheap to clone; one instance can be
/// shared across tasks as long as its transport is. To use it you must
/// register for an API key at <https://untappd.com/api/register>.
///
/// Endpoint wrappers are expected to be thin: pick a [`Method`], a relative
/// endpoint path, query parameters, and a destination type, then call
/// [`Client::request`].
#[derive(Clone)]
pub struct Client<T = HyperTransport> {
    transport: T,
    base_url: Url,
    client_id: String,
    client_secret: String,
    user_agent: String,
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The client secret stays out of debug output
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Client<HyperTransport> {
    /// Create a client with the default hyper transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] or [`Error::MissingClientSecret`]
    /// if either credential is empty. No network activity happens here.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::builder(client_id, client_secret).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ClientBuilder<HyperTransport> {
        ClientBuilder {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: HyperTransport::new(),
        }
    }
}

impl<T> Client<T> {
    /// The resolved API root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The identification string sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get a reference to the injected transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve the final URL for an endpoint: join the relative path beneath
    /// the API root (trailing slash appended), merge caller query parameters,
    /// and append the credential pair.
    ///
    /// Caller-supplied `client_id`/`client_secret` pairs are dropped so the
    /// configured credentials always win.
    fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("{}/", endpoint.trim_matches('/')))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                if *name == CLIENT_ID_PARAM || *name == CLIENT_SECRET_PARAM {
                    continue;
                }
                pairs.append_pair(name, value);
            }
            pairs.append_pair(CLIENT_ID_PARAM, &self.client_id);
            pairs.append_pair(CLIENT_SECRET_PARAM, &self.client_secret);
        }

        Ok(url)
    }
}

impl<T: Transport> Client<T> {
    /// Execute `method` against a relative `endpoint` and decode the response
    /// body into `D`.
    ///
    /// # Errors
    ///
    /// Transport failures pass through unmodified; validation failures come
    /// back as [`Error::UnexpectedContentType`], [`Error::Json`], or
    /// [`Error::Api`]; a success body that does not match `D` is
    /// [`Error::Json`].
    pub async fn request<D: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<D> {
        let response = self.request_raw(method, endpoint, query).await?;
        from_json(response.body())
    }

    /// Execute `method` against a relative `endpoint`, returning the validated
    /// response without touching its body.
    ///
    /// This is the "no destination" form: the body is never decoded, so a
    /// malformed success body cannot produce an error here.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`], minus destination decoding.
    pub async fn request_raw(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Response<Bytes>> {
        let url = self.endpoint_url(endpoint, query)?;
        let request = Request::builder(method, url)
            .header(header::ACCEPT.as_str(), JSON_MEDIA_TYPE)
            .header(header::CONTENT_TYPE.as_str(), JSON_MEDIA_TYPE)
            .header(header::USER_AGENT.as_str(), self.user_agent.as_str())
            .build();

        debug!(%method, url = %request.url(), "dispatching API request");
        let response = self.transport.execute(request).await?;

        match validate(&response) {
            Ok(()) => Ok(response),
            Err(err) => {
                if let Error::Api(api) = &err {
                    warn!(code = api.code, error_type = %api.error_type, "API call failed");
                }
                Err(err)
            }
        }
    }
}

/// Builder for [`Client`].
///
/// Created through [`Client::builder`]; credentials are validated in
/// [`ClientBuilder::build`], before any request is made.
#[derive(Debug)]
pub struct ClientBuilder<T = HyperTransport> {
    client_id: String,
    client_secret: String,
    base_url: String,
    user_agent: String,
    transport: T,
}

impl<T> ClientBuilder<T> {
    /// Override the API root (mainly useful against a test server).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the identification string sent with every request.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Swap in a different transport implementation.
    #[must_use]
    pub fn transport<T2>(self, transport: T2) -> ClientBuilder<T2> {
        ClientBuilder {
            client_id: self.client_id,
            client_secret: self.client_secret,
            base_url: self.base_url,
            user_agent: self.user_agent,
            transport,
        }
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] or [`Error::MissingClientSecret`]
    /// for an empty credential, or [`Error::InvalidUrl`] if the base URL does
    /// not parse.
    pub fn build(self) -> Result<Client<T>> {
        if self.client_id.is_empty() {
            return Err(Error::MissingClientId);
        }
        if self.client_secret.is_empty() {
            return Err(Error::MissingClientSecret);
        }

        let mut base_url = Url::parse(&self.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Client {
            transport: self.transport,
            base_url,
            client_id: self.client_id,
            client_secret: self.client_secret,
            user_agent: self.user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert2::let_assert;

    use super::*;

    fn test_client() -> Client<()> {
        Client::builder("foo", "bar")
            .transport(())
            .build()
            .expect("client")
    }

    #[test]
    fn builder_validates_credentials() {
        let cases: &[(&str, &str, Option<fn(&Error) -> bool>)] = &[
            ("", "", Some(|e| matches!(e, Error::MissingClientId))),
            ("", "bar", Some(|e| matches!(e, Error::MissingClientId))),
            ("foo", "", Some(|e| matches!(e, Error::MissingClientSecret))),
            ("foo", "bar", None),
        ];

        for (client_id, client_secret, expected) in cases {
            let result = Client::builder(*client_id, *client_secret)
                .transport(())
                .build();
            match expected {
                Some(is_expected) => {
                    let_assert!(Err(err) = result);
                    assert!(is_expected(&err), "unexpected error: {err}");
                }
                None => assert!(result.is_ok()),
            }
        }
    }

    #[test]
    fn builder_rejects_invalid_base_url() {
        let result = Client::builder("foo", "bar")
            .base_url("not a url")
            .transport(())
            .build();

        let_assert!(Err(Error::InvalidUrl(_)) = result);
    }

    #[test]
    fn builder_appends_trailing_slash() {
        let client = Client::builder("foo", "bar")
            .base_url("https://api.untappd.com/v4")
            .transport(())
            .build()
            .expect("client");

        assert_eq!(client.base_url().as_str(), "https://api.untappd.com/v4/");
    }

    #[test]
    fn endpoint_url_joins_beneath_api_root() {
        let client = test_client();
        let url = client
            .endpoint_url("user/info/gregavola", &[])
            .expect("url");

        assert_eq!(url.path(), "/v4/user/info/gregavola/");
        assert_eq!(url.host_str(), Some("api.untappd.com"));
    }

    #[test]
    fn endpoint_url_always_carries_credentials() {
        let client = test_client();
        let url = client.endpoint_url("beer/info/1", &[]).expect("url");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client_id".to_string(), "foo".to_string())));
        assert!(pairs.contains(&("client_secret".to_string(), "bar".to_string())));
    }

    #[test]
    fn endpoint_url_credentials_override_caller_pairs() {
        let client = test_client();
        let url = client
            .endpoint_url(
                "beer/info/1",
                &[("client_id", "stolen"), ("client_secret", "stolen")],
            )
            .expect("url");

        let ids: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "client_id")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(ids, vec!["foo".to_string()]);

        let secrets: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "client_secret")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(secrets, vec!["bar".to_string()]);
    }

    #[test]
    fn endpoint_url_keeps_multi_valued_pairs() {
        let client = test_client();
        let url = client
            .endpoint_url(
                "search/beer",
                &[("foo", "bar"), ("baz", "qux"), ("baz", "corge")],
            )
            .expect("url");

        let values: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "baz")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(values, vec!["qux".to_string(), "corge".to_string()]);
    }

    #[test]
    fn client_debug_hides_secret() {
        let client = test_client();
        let debug = format!("{client:?}");
        assert!(debug.contains("client_id"));
        assert!(!debug.contains("bar"));
    }
}
