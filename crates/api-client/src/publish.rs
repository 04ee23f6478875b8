//! Republish channel.
//!
//! [`Publisher`] posts a finished artifact to a hosted HTTP source URL so
//! that it comes back into the platform as log data. The routing label
//! travels in the `X-Sumo-Category` header.

use std::sync::Arc;

use tracing::{debug, trace};

use savecfg_core::error::ApiError;

use crate::transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};

/// Header naming the destination source category.
pub const CATEGORY_HEADER: &str = "X-Sumo-Category";

/// Content type used for every republished payload.
pub const PAYLOAD_CONTENT_TYPE: &str = "text/csv";

/// Posts artifacts to one HTTP source URL.
#[derive(Clone)]
pub struct Publisher {
    transport: Arc<dyn Transport>,
    url: String,
}

impl Publisher {
    /// Publisher over an unauthenticated `reqwest` session.
    pub fn new(url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::with_transport(
            Arc::new(ReqwestTransport::unauthenticated()?),
            url,
        ))
    }

    /// Publisher over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `payload` under `category`.
    ///
    /// The source URL never appears unredacted in the returned error.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] if the source answers with a non-2xx status,
    /// [`ApiError::Transport`] if the request could not be sent.
    pub async fn publish(&self, payload: Vec<u8>, category: &str) -> Result<ApiResponse, ApiError> {
        let size = payload.len();
        let endpoint = redact_url(&self.url);
        trace!(payload = %String::from_utf8_lossy(&payload), "republish payload");

        let headers = [
            ("Content-Type", PAYLOAD_CONTENT_TYPE),
            ("Accept", PAYLOAD_CONTENT_TYPE),
            (CATEGORY_HEADER, category),
        ];
        debug!(
            endpoint = %endpoint,
            content_type = PAYLOAD_CONTENT_TYPE,
            headers = ?headers,
            "republish request"
        );
        let request = ApiRequest::new(Method::Post, self.url.as_str())
            .with_headers(Some(&headers[..]))
            .with_body(Some(payload));

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| self.redact_error(e))?;
        debug!(
            endpoint = %endpoint,
            category,
            status = response.status,
            bytes = size,
            "artifact republished"
        );
        response
            .error_for_status(Method::Post)
            .map_err(|e| self.redact_error(e))
    }

    fn redact_error(&self, err: ApiError) -> ApiError {
        let redacted = redact_url(&self.url);
        match err {
            ApiError::Status {
                method,
                status,
                body,
                ..
            } => ApiError::Status {
                method,
                url: redacted,
                status,
                body,
            },
            ApiError::Transport(reason) => ApiError::Transport(reason.replace(&self.url, &redacted)),
            other => other,
        }
    }
}

/// Hide the trailing token of an HTTP source URL.
///
/// Source URLs embed their auth token as the last path segment, so logs
/// keep the scheme, host and leading path only.
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_owned();
    };
    match url[scheme_end..].rsplit_once('/') {
        Some((head, tail)) if !tail.is_empty() => {
            format!("{}{head}/***REDACTED***", &url[..scheme_end])
        }
        _ => url.to_owned(),
    }
}
