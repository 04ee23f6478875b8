//! 에러 타입 -- 도메인별 에러 정의

/// savecfg 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SavecfgError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// API 호출 에러
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// 쿼리 결과 포맷 에러
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// 매니페스트(쿼리 레지스트리) 에러
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 모든 소스를 확인했지만 필수 변수가 없음
    #[error("required variable not set: {name}")]
    MissingVariable { name: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// API 호출 에러
///
/// `Status`의 메시지에는 응답 본문이 그대로 포함됩니다.
/// 플랫폼은 실패 사유를 본문에만 담아 보내기 때문입니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 엔드포인트 형식 위반 (예: 끝에 슬래시)
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// 2xx 이외의 응답
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// 연결/전송 실패
    #[error("transport error: {0}")]
    Transport(String),

    /// 응답 본문 JSON 디코딩 실패
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// 요청 본문 직렬화 실패
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP 상태 코드 (`Status` 변형일 때만)
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 쿼리 결과 포맷 에러
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// 응답에 목록 필드가 없음
    #[error("{query}: response has no '{field}' list")]
    MissingList { query: String, field: String },

    /// 레코드에 필드가 없음
    #[error("{query}: record {index} has no '{field}' field")]
    MissingField {
        query: String,
        index: usize,
        field: String,
    },

    /// 결과 렌더링 실패
    #[error("{query}: failed to render output: {reason}")]
    Render { query: String, reason: String },
}

/// 매니페스트 에러
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// JSON 파싱 실패
    #[error("failed to parse manifest: {reason}")]
    ParseFailed { reason: String },

    /// 매니페스트 경로에 해당하는 쿼리 모듈이 없음
    #[error("query '{name}' points at unknown module path '{path}'")]
    UnknownModule { name: String, path: String },

    /// 산출물 파일 이름으로 쓸 수 없는 쿼리 이름
    #[error("invalid query name '{name}': use letters, digits, '_', '-' or '.'")]
    InvalidName { name: String },

    /// 등록된 쿼리가 하나도 없음
    #[error("manifest registers no queries")]
    Empty,
}
