use http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ClientError;

/// HTTP proxy endpoint: host and port, both required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    host: String,
    port: u16,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Per-call request descriptor: headers applied verbatim to the outgoing
/// request, plus an optional proxy. Immutable once built; construct a fresh
/// one for each operation from the current session state.
#[derive(Debug, Default)]
pub struct Request {
    headers: HeaderMap,
    proxy: Option<ProxyConfig>,
}

impl Request {
    /// Create a new request builder
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Get the request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the proxy configuration, if any
    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }
}

/// Builder for constructing request descriptors with a fluent API
#[derive(Debug, Default)]
pub struct RequestBuilder {
    headers: HeaderMap,
    proxy: Option<ProxyConfig>,
}

impl RequestBuilder {
    /// Add a header. Header keys are unique; inserting a key that is already
    /// present is rejected rather than overwritten.
    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self, ClientError>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Display,
        V::Error: std::fmt::Display,
    {
        let key = key
            .try_into()
            .map_err(|e| ClientError::BuildError(format!("Invalid header name: {}", e)))?;
        let value = value
            .try_into()
            .map_err(|e| ClientError::BuildError(format!("Invalid header value: {}", e)))?;
        if self.headers.contains_key(&key) {
            return Err(ClientError::DuplicateHeader(key.to_string()));
        }
        self.headers.insert(key, value);
        Ok(self)
    }

    /// Add an `Authorization: Bearer <token>` header
    pub fn bearer(self, token: &str) -> Result<Self, ClientError> {
        self.header(http::header::AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Route the call through the given proxy
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Build the request descriptor
    pub fn build(self) -> Request {
        Request {
            headers: self.headers,
            proxy: self.proxy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_added_verbatim() {
        let request = Request::builder()
            .header("X-Custom", "value-1")
            .unwrap()
            .build();
        assert_eq!(request.headers().get("x-custom").unwrap(), "value-1");
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let result = Request::builder()
            .header("X-Custom", "value-1")
            .unwrap()
            .header("X-Custom", "value-2");
        assert!(matches!(result, Err(ClientError::DuplicateHeader(_))));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let result = Request::builder().header("bad name", "value");
        assert!(matches!(result, Err(ClientError::BuildError(_))));
    }

    #[test]
    fn test_bearer_header() {
        let request = Request::builder().bearer("abc123").unwrap().build();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_proxy_url() {
        let proxy = ProxyConfig::new("proxy.internal", 3128);
        assert_eq!(proxy.url(), "http://proxy.internal:3128");
    }
}
