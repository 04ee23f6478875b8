//! 도메인 타입 -- 크레이트 전역에서 사용되는 공통 타입

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// API 접근 자격 증명 (access id, access key)
///
/// `Debug` 출력에서 키 값은 가려집니다.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    /// access id (`SUMO_UID`)
    pub access_id: String,
    /// access key (`SUMO_KEY`)
    pub access_key: String,
}

impl CredentialPair {
    /// 새 자격 증명을 생성합니다.
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_id", &self.access_id)
            .field("access_key", &"***REDACTED***")
            .finish()
    }
}

/// `id:secret` 형식의 문자열을 파싱합니다.
///
/// 첫 번째 `:`를 기준으로 나누며, 양쪽 모두 비어 있으면 안 됩니다.
impl FromStr for CredentialPair {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "secret".to_owned(),
            reason: reason.to_owned(),
        };

        let (id, key) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected <access id>:<access key>"))?;
        if id.is_empty() {
            return Err(invalid("access id must not be empty"));
        }
        if key.is_empty() {
            return Err(invalid("access key must not be empty"));
        }
        Ok(Self::new(id, key))
    }
}
