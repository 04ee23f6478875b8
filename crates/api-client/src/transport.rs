//! HTTP execution seam for testability.
//!
//! The [`Transport`] trait is the single point where requests leave the
//! process. Production code uses [`ReqwestTransport`]; tests substitute
//! `MockTransport` (feature `test-util`).
//!
//! ```text
//! ┌───────────┐   ┌───────────┐
//! │ ApiClient │   │ Publisher │
//! └─────┬─────┘   └─────┬─────┘
//!       └───────┬───────┘
//!               ▼
//!        ┌────────────┐
//!        │ Transport  │ (trait)
//!        └────────────┘
//!           │      │
//!           ▼      ▼
//!      ┌───────┐ ┌──────┐
//!      │reqwest│ │ Mock │
//!      └───────┘ └──────┘
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::trace;

use savecfg_core::error::ApiError;
use savecfg_core::types::CredentialPair;

/// Boxed, sendable future returned by dyn-compatible async traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully resolved request, ready to be executed by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Query string parameters, in order.
    pub params: Vec<(String, String)>,
    /// Per-request headers, applied on top of the transport defaults.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request with no parameters, headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append query string parameters.
    pub fn with_params(mut self, params: Option<&[(&str, &str)]>) -> Self {
        if let Some(params) = params {
            self.params
                .extend(params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));
        }
        self
    }

    /// Append request headers.
    pub fn with_headers(mut self, headers: Option<&[(&str, &str)]>) -> Self {
        if let Some(headers) = headers {
            self.headers
                .extend(headers.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));
        }
        self
    }

    /// Attach a raw body.
    pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }

    /// Look up a header value (case-insensitive name match).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The raw outcome of an executed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Final URL, after any redirects were followed.
    pub url: String,
    /// Response body as text.
    pub body: String,
}

impl ApiResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Turn a non-2xx response into [`ApiError::Status`], carrying the body
    /// as the diagnostic detail.
    pub fn error_for_status(self, method: Method) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                method: method.to_string(),
                url: self.url,
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Trait abstracting HTTP execution.
///
/// Implementations return transport failures as [`ApiError::Transport`]
/// and hand back every HTTP response, whatever its status. Status
/// handling is the caller's concern.
pub trait Transport: Send + Sync {
    /// Execute one request.
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, ApiError>>;
}

/// Production [`Transport`] backed by a single `reqwest::Client`.
///
/// All requests made through one instance share the client's connection
/// pool and in-process cookie store. When credentials are present every
/// request carries HTTP basic auth.
pub struct ReqwestTransport {
    client: reqwest::Client,
    credentials: Option<CredentialPair>,
}

impl ReqwestTransport {
    /// Transport for the REST API: JSON default headers, cookies, basic auth.
    pub fn authenticated(credentials: &CredentialPair) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            credentials: Some(credentials.clone()),
        })
    }

    /// Transport without credentials or default headers (republish channel).
    pub fn unauthenticated() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            credentials: None,
        })
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .query(&request.params);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.access_id, Some(&creds.access_key));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // drop reqwest's copy of the URL; only request.url remains, which callers can redact
        let response = builder.send().await.map_err(|e| {
            ApiError::Transport(format!("{} {}: {}", request.method, request.url, e.without_url()))
        })?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            ApiError::Transport(format!(
                "failed to read body from {}: {}",
                request.url,
                e.without_url()
            ))
        })?;

        trace!(method = %request.method, status, bytes = body.len(), "http exchange complete");
        Ok(ApiResponse { status, url, body })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, ApiError>> {
        Box::pin(self.send(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            url: "https://api.us2.sumologic.com/api/v1/tokens".to_owned(),
            body: body.to_owned(),
        }
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(response(200, "").is_success());
        assert!(response(204, "").is_success());
        assert!(!response(301, "").is_success());
        assert!(!response(401, "").is_success());
        assert!(!response(500, "").is_success());
    }

    #[test]
    fn error_for_status_carries_body() {
        let err = response(404, r#"{"errors":[{"code":"not_found"}]}"#)
            .error_for_status(Method::Get)
            .unwrap_err();
        match err {
            ApiError::Status {
                method,
                status,
                body,
                ..
            } => {
                assert_eq!(method, "GET");
                assert_eq!(status, 404);
                assert!(body.contains("not_found"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn json_decode_failure_names_url() {
        let err = response(200, "not json")
            .json::<serde_json::Value>()
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref url, .. } if url.ends_with("/v1/tokens")));
    }

    #[test]
    fn request_builder_collects_params_and_headers() {
        let req = ApiRequest::new(Method::Get, "https://example.test/v1/x")
            .with_params(Some(&[("limit", "100")][..]))
            .with_headers(Some(&[("X-Test", "yes")][..]))
            .with_body(None);
        assert_eq!(req.params, vec![("limit".to_owned(), "100".to_owned())]);
        assert_eq!(req.header("x-test"), Some("yes"));
        assert_eq!(req.body, None);
    }

    #[test]
    fn method_display_matches_http_verb() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(Method::Put), reqwest::Method::PUT);
    }
}
