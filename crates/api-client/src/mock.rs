//! In-memory [`Transport`] for tests.
//!
//! Routes are matched on method and exact URL. Unmatched requests get a
//! 404 whose body names the request, so a missing fixture shows up in the
//! resulting `ApiError::Status` message.

use std::collections::HashMap;
use std::sync::Mutex;

use savecfg_core::error::ApiError;

use crate::transport::{ApiRequest, ApiResponse, BoxFuture, Method, Transport};

#[derive(Debug, Clone)]
enum Canned {
    Response { status: u16, final_url: Option<String>, body: String },
    Failure(String),
}

/// 테스트용 Mock transport
///
/// 설정된 응답을 반환하고, 받은 요청을 순서대로 기록합니다.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: HashMap<(Method, String), Canned>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// 라우트가 없는 mock transport를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// `method url`에 대해 `status`와 `body`를 반환합니다.
    pub fn with_response(mut self, method: Method, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            (method, url.to_owned()),
            Canned::Response {
                status,
                final_url: None,
                body: body.to_owned(),
            },
        );
        self
    }

    /// `with_response`와 같지만, 리다이렉트 이후의 최종 URL을 `final_url`로 보고합니다.
    pub fn with_redirect(
        mut self,
        method: Method,
        url: &str,
        final_url: &str,
        status: u16,
        body: &str,
    ) -> Self {
        self.routes.insert(
            (method, url.to_owned()),
            Canned::Response {
                status,
                final_url: Some(final_url.to_owned()),
                body: body.to_owned(),
            },
        );
        self
    }

    /// `method url` 호출 시 전송 실패를 시뮬레이션합니다.
    pub fn with_failure(mut self, method: Method, url: &str, reason: &str) -> Self {
        self.routes
            .insert((method, url.to_owned()), Canned::Failure(reason.to_owned()));
        self
    }

    /// 지금까지 받은 요청 목록
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn respond(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        match self.routes.get(&(request.method, request.url.clone())) {
            Some(Canned::Response {
                status,
                final_url,
                body,
            }) => Ok(ApiResponse {
                status: *status,
                url: final_url.clone().unwrap_or_else(|| request.url.clone()),
                body: body.clone(),
            }),
            Some(Canned::Failure(reason)) => Err(ApiError::Transport(reason.clone())),
            None => Ok(ApiResponse {
                status: 404,
                url: request.url.clone(),
                body: format!("no mock route for {} {}", request.method, request.url),
            }),
        }
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, ApiError>> {
        let result = self.respond(&request);
        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unmatched_route_is_404_naming_request() {
        let transport = MockTransport::new();
        let response = transport
            .execute(ApiRequest::new(Method::Get, "https://x.test/v1/a"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert!(response.body.contains("GET https://x.test/v1/a"));
    }

    #[tokio::test]
    async fn failure_route_returns_transport_error() {
        let transport =
            MockTransport::new().with_failure(Method::Post, "https://x.test/in", "reset by peer");
        let err = transport
            .execute(ApiRequest::new(Method::Post, "https://x.test/in"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref r) if r == "reset by peer"));
        assert_eq!(transport.requests().len(), 1);
    }
}
