//! 쿼리 모듈 계약
//!
//! 모든 쿼리는 같은 흐름을 따릅니다.
//!
//! ```text
//! ApiClient::get_object(path) ──▶ Query::format(body, datestamp) ──▶ String
//! ```
//!
//! 형식 변환(`format`)은 순수 함수이므로 네트워크 없이 테스트할 수 있습니다.

use chrono::Local;
use serde_json::Value;
use tracing::debug;

use savecfg_api::{ApiClient, BoxFuture};
use savecfg_core::error::{QueryError, SavecfgError};

/// 표 형식 산출물의 날짜 열 포맷 (`YYYYMMDD`, 로컬 시간)
pub const DATESTAMP_FORMAT: &str = "%Y%m%d";

/// 오늘 날짜 스탬프
pub fn datestamp() -> String {
    Local::now().format(DATESTAMP_FORMAT).to_string()
}

/// 하나의 객체 유형을 조회해 텍스트 산출물로 만드는 쿼리
///
/// `dyn Query`로 레지스트리에 저장되므로 async 메서드는
/// [`BoxFuture`]를 반환합니다.
pub trait Query: Send + Sync {
    /// 쿼리 이름 (산출물 파일 이름과 카테고리에 사용)
    fn name(&self) -> &str;

    /// 엔드포인트 기준 API 경로 (예: `/v1/tokens`)
    fn path(&self) -> &str;

    /// API 응답 본문을 산출물 텍스트로 변환합니다.
    fn format(&self, body: &Value, datestamp: &str) -> Result<String, QueryError>;

    /// 경로를 한 번 조회하고 결과를 변환합니다.
    ///
    /// # Errors
    /// - [`SavecfgError::Api`]: 조회 실패 (2xx 이외 응답 포함)
    /// - [`SavecfgError::Query`]: 응답 형태가 예상과 다름
    fn get_and_format_output<'a>(
        &'a self,
        client: &'a ApiClient,
    ) -> BoxFuture<'a, Result<String, SavecfgError>> {
        Box::pin(async move {
            let body = client.get_object(self.path()).await?;
            let output = self.format(&body, &datestamp())?;
            debug!(query = self.name(), bytes = output.len(), "query output formatted");
            Ok(output)
        })
    }
}
