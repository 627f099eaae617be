use std::time::Duration;

use http::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::body::Body;
use crate::request::Request;
use crate::response::{ApiResponse, RawOutcome, normalize};

/// Ceiling applied to every call; there is no mid-flight cancellation.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Field name and filename of the single multipart part carrying binary uploads.
const BINARY_PART_NAME: &str = "xml";

/// Performs one HTTP call per operation against a fixed base URL and hands
/// the raw outcome to the normalizer.
///
/// The underlying `reqwest::Client` is built fresh for each call so proxy and
/// timeout configuration stay call-local; no connection state leaks between
/// calls. Transport failures never escape: every entry point returns an
/// [`ApiResponse`] envelope.
pub struct Executor {
    base_url: String,
}

impl Executor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET with no body
    pub async fn get<D: DeserializeOwned>(&self, path: &str, request: &Request) -> ApiResponse<D> {
        normalize(self.dispatch(Method::GET, path, request, Body::Empty).await)
    }

    /// POST an arbitrary [`Body`]
    pub async fn post<D: DeserializeOwned>(
        &self,
        path: &str,
        request: &Request,
        body: Body,
    ) -> ApiResponse<D> {
        normalize(self.dispatch(Method::POST, path, request, body).await)
    }

    /// POST with no body
    pub async fn post_empty<D: DeserializeOwned>(
        &self,
        path: &str,
        request: &Request,
    ) -> ApiResponse<D> {
        self.post(path, request, Body::Empty).await
    }

    /// POST a JSON text body. `content_type` overrides the default
    /// `application/json`.
    pub async fn post_json<D: DeserializeOwned>(
        &self,
        path: &str,
        request: &Request,
        body: &str,
        content_type: Option<&str>,
    ) -> ApiResponse<D> {
        let body = match content_type {
            Some(ct) => Body::json_with_content_type(body, ct),
            None => Body::json(body),
        };
        self.post(path, request, body).await
    }

    /// POST raw bytes as a single multipart form part (binary/document uploads)
    pub async fn post_binary<D: DeserializeOwned>(
        &self,
        path: &str,
        request: &Request,
        content: impl Into<bytes::Bytes>,
    ) -> ApiResponse<D> {
        self.post(path, request, Body::Binary(content.into())).await
    }

    /// Single primitive every entry point converges on: build a scoped
    /// client, send one request, and capture the outcome. Transport errors
    /// are caught here and returned as `RawOutcome::Failed`.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        request: &Request,
        body: Body,
    ) -> RawOutcome {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = request.proxy() {
            match reqwest::Proxy::all(proxy.url()) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => return RawOutcome::Failed(Box::new(e)),
            }
        }
        let client = match builder.build() {
            Ok(c) => c,
            Err(e) => return RawOutcome::Failed(Box::new(e)),
        };

        let url = join_url(&self.base_url, path);
        debug!(%method, %url, body = ?body, "dispatching request");

        let mut req = client.request(method, &url);
        for (name, value) in request.headers() {
            req = req.header(name, value);
        }
        req = match body {
            Body::Empty => req,
            Body::Json { text, content_type } => {
                req.header(http::header::CONTENT_TYPE, content_type).body(text)
            }
            Body::Binary(bytes) => {
                let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                    .file_name(BINARY_PART_NAME);
                req.multipart(reqwest::multipart::Form::new().part(BINARY_PART_NAME, part))
            }
        };

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => return RawOutcome::Failed(Box::new(e)),
        };
        let status = resp.status();
        match resp.bytes().await {
            Ok(body) => RawOutcome::Completed { status, body },
            Err(e) => RawOutcome::Failed(Box::new(e)),
        }
    }
}

/// Join a base URL and a relative path with exactly one separating slash
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_trailing_slash() {
        assert_eq!(
            join_url("http://host:8080/", "/a/b"),
            "http://host:8080/a/b"
        );
    }

    #[test]
    fn test_join_url_no_slashes() {
        assert_eq!(join_url("http://host:8080", "a/b"), "http://host:8080/a/b");
    }
}
