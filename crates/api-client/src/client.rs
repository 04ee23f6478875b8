//! Authenticated REST API client.
//!
//! [`ApiClient`] pairs one [`Transport`] (one HTTP session: basic auth,
//! cookie store, connection pool) with a resolved [`Endpoint`]. Every
//! verb takes a path relative to the endpoint, such as `/v1/tokens`.
//!
//! # Error handling
//!
//! Every verb fails with [`ApiError::Status`] on a non-2xx response. The
//! error message includes the response body, which is where the platform
//! puts its error detail.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), savecfg_core::error::ApiError> {
//! use savecfg_api::ApiClient;
//! use savecfg_core::types::CredentialPair;
//!
//! let creds = CredentialPair::new("suABCD", "secret");
//! let client = ApiClient::connect(&creds, Some("us2")).await?;
//! let tokens = client.get_object("/v1/tokens").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use savecfg_core::error::ApiError;
use savecfg_core::types::CredentialPair;

use crate::endpoint::{self, Endpoint};
use crate::transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};

/// Optional `(name, value)` pairs for query parameters or headers.
pub type Pairs<'a> = Option<&'a [(&'a str, &'a str)]>;

/// REST API client bound to one endpoint and one HTTP session.
///
/// Safe for sequential reuse across queries.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
}

impl ApiClient {
    /// Build a client with a `reqwest` session authenticated as `credentials`.
    ///
    /// With no `endpoint` this performs auto-discovery, which needs network
    /// access to the default endpoint.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidEndpoint`]: the endpoint ends with `/` or is empty
    /// - [`ApiError::Transport`]: the HTTP client could not be built, or discovery failed
    pub async fn connect(
        credentials: &CredentialPair,
        endpoint: Option<&str>,
    ) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::authenticated(credentials)?);
        Self::with_transport(transport, endpoint).await
    }

    /// Build a client over an arbitrary transport.
    pub async fn with_transport(
        transport: Arc<dyn Transport>,
        endpoint: Option<&str>,
    ) -> Result<Self, ApiError> {
        let endpoint = endpoint::resolve(transport.as_ref(), endpoint).await?;
        debug!(endpoint = %endpoint, "api client ready");
        Ok(Self {
            transport,
            endpoint,
        })
    }

    /// The resolved endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// `GET endpoint + path`.
    pub async fn get(
        &self,
        path: &str,
        params: Pairs<'_>,
        headers: Pairs<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::new(Method::Get, self.endpoint.join(path))
            .with_params(params)
            .with_headers(headers);
        self.send(request).await
    }

    /// `POST endpoint + path` with `data` serialized as JSON.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        headers: Pairs<'_>,
        params: Pairs<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::new(Method::Post, self.endpoint.join(path))
            .with_params(params)
            .with_headers(headers)
            .with_body(Some(encode(data)?));
        self.send(request).await
    }

    /// `PUT endpoint + path` with `data` serialized as JSON.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        headers: Pairs<'_>,
        params: Pairs<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::new(Method::Put, self.endpoint.join(path))
            .with_params(params)
            .with_headers(headers)
            .with_body(Some(encode(data)?));
        self.send(request).await
    }

    /// `DELETE endpoint + path`, with an optional raw body.
    pub async fn delete(
        &self,
        path: &str,
        params: Pairs<'_>,
        headers: Pairs<'_>,
        data: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::new(Method::Delete, self.endpoint.join(path))
            .with_params(params)
            .with_headers(headers)
            .with_body(data.map(|d| d.as_bytes().to_vec()));
        self.send(request).await
    }

    /// `GET endpoint + path` and parse the body as JSON.
    pub async fn get_object(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.get(path, None, None).await?.json()
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        debug!(%method, url = %request.url, "api request");
        let response = self.transport.execute(request).await?;
        debug!(%method, url = %response.url, status = response.status, "api response");
        response.error_for_status(method)
    }
}

fn encode<B: Serialize + ?Sized>(data: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(data).map_err(|e| ApiError::Encode(e.to_string()))
}
