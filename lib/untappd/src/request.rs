//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers and query
//! parameters. Untappd APIv4 requests never carry a body; everything a call
//! needs travels in the URL and headers.

use std::collections::HashMap;

use crate::Method;

/// An HTTP request with method, URL, and headers.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Consume into (method, url, headers).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>) {
        (self.method, self.url, self.headers)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Appends multiple query parameters to the URL.
    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        {
            let mut query = self.url.query_pairs_mut();
            for (name, value) in pairs {
                query.append_pair(&name, &value);
            }
        }
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_basic() {
        let url = url::Url::parse("https://api.untappd.com/v4/user/info/").expect("valid URL");
        let request = Request::builder(Method::Get, url.clone())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.untappd.com/v4/user/info/");
        assert_eq!(request.header("Accept"), Some("application/json"));
    }

    #[test]
    fn request_builder_with_query() {
        let url = url::Url::parse("https://api.untappd.com/v4/search/beer/").expect("valid URL");
        let request = Request::builder(Method::Get, url)
            .query("q", "stout")
            .query("limit", "10")
            .build();

        assert_eq!(
            request.url().as_str(),
            "https://api.untappd.com/v4/search/beer/?q=stout&limit=10"
        );
    }

    #[test]
    fn request_builder_query_pairs_keeps_repeats() {
        let url = url::Url::parse("https://api.untappd.com/v4/search/beer/").expect("valid URL");
        let request = Request::builder(Method::Get, url)
            .query_pairs([
                ("tag".to_string(), "ipa".to_string()),
                ("tag".to_string(), "stout".to_string()),
            ])
            .build();

        assert_eq!(
            request.url().as_str(),
            "https://api.untappd.com/v4/search/beer/?tag=ipa&tag=stout"
        );
    }
}
