//! 설정 관리 -- 자격 증명 / 엔드포인트 / 재게시 URL 해석
//!
//! 값은 세 개의 [`SettingsLayer`]에서 수집되어 [`Settings`]로 병합됩니다.
//!
//! # 설정 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 설정 파일 (INI, `[Default]` 섹션)
//! 3. 환경변수 (`SUMO_UID`, `SUMO_KEY`, `SUMO_URL`, `SUMO_ENDPOINT`)
//!
//! 병합 과정에서 프로세스 환경변수를 수정하지 않습니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), savecfg_core::error::SavecfgError> {
//! use savecfg_core::config::{Settings, SettingsLayer};
//!
//! let file = SettingsLayer::from_file("savecfg.ini").await?;
//! let settings = Settings::resolve(SettingsLayer::default(), Some(file), SettingsLayer::from_env())?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use ini::{Ini, ParseOption};
use tracing::debug;

use crate::error::{ConfigError, SavecfgError};
use crate::types::CredentialPair;

/// access id 변수 이름
pub const VAR_UID: &str = "SUMO_UID";
/// access key 변수 이름
pub const VAR_KEY: &str = "SUMO_KEY";
/// 재게시 대상(HTTP 소스) URL 변수 이름
pub const VAR_URL: &str = "SUMO_URL";
/// API 엔드포인트(지역 코드 또는 URL) 변수 이름
pub const VAR_ENDPOINT: &str = "SUMO_ENDPOINT";

/// INI 파일에서 읽는 섹션 이름
pub const INI_SECTION: &str = "Default";

/// 하나의 설정 소스에서 읽은 값
///
/// 빈 문자열은 설정되지 않은 것으로 취급합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsLayer {
    /// access id
    pub access_id: Option<String>,
    /// access key
    pub access_key: Option<String>,
    /// 재게시 대상 URL
    pub publish_url: Option<String>,
    /// API 엔드포인트 지정자
    pub endpoint: Option<String>,
}

impl SettingsLayer {
    /// 변수 이름으로 값을 조회하는 함수에서 레이어를 만듭니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            access_id: get(VAR_UID),
            access_key: get(VAR_KEY),
            publish_url: get(VAR_URL),
            endpoint: get(VAR_ENDPOINT),
        }
    }

    /// 주어진 조회 함수로 환경변수 레이어를 만듭니다.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_lookup(lookup)
    }

    /// 프로세스 환경변수에서 레이어를 만듭니다.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// INI 문자열의 `[Default]` 섹션에서 레이어를 만듭니다.
    ///
    /// 키는 대소문자를 구분합니다. 섹션이 없으면 빈 레이어를 반환합니다.
    pub fn from_ini_str(content: &str) -> Result<Self, SavecfgError> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, opt).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;

        let Some(section) = ini.section(Some(INI_SECTION)) else {
            debug!(section = INI_SECTION, "config file has no settings section");
            return Ok(Self::default());
        };

        debug!(
            keys = ?section.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            "config file section loaded"
        );
        Ok(Self::from_lookup(|name| section.get(name).map(str::to_owned)))
    }

    /// INI 파일에서 레이어를 만듭니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SavecfgError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SavecfgError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SavecfgError::Io(e)
            }
        })?;
        Self::from_ini_str(&content)
    }

    /// CLI 자격 증명 쌍을 레이어에 채웁니다.
    pub fn with_credentials(mut self, pair: CredentialPair) -> Self {
        self.access_id = Some(pair.access_id);
        self.access_key = Some(pair.access_key);
        self
    }

    /// 비어 있는 필드를 우선순위가 낮은 레이어의 값으로 채웁니다.
    pub fn or(self, lower: SettingsLayer) -> Self {
        Self {
            access_id: self.access_id.or(lower.access_id),
            access_key: self.access_key.or(lower.access_key),
            publish_url: self.publish_url.or(lower.publish_url),
            endpoint: self.endpoint.or(lower.endpoint),
        }
    }
}

/// 최종 해석된 실행 설정
#[derive(Debug, Clone)]
pub struct Settings {
    /// API 자격 증명
    pub credentials: CredentialPair,
    /// 재게시 대상 URL (없으면 재게시하지 않음)
    pub publish_url: Option<String>,
    /// API 엔드포인트 지정자 (없으면 자동 탐지)
    pub endpoint: Option<String>,
}

impl Settings {
    /// CLI > 설정 파일 > 환경변수 순으로 병합하고 필수 값을 검증합니다.
    pub fn resolve(
        cli: SettingsLayer,
        file: Option<SettingsLayer>,
        env: SettingsLayer,
    ) -> Result<Self, ConfigError> {
        let merged = cli.or(file.unwrap_or_default()).or(env);

        let access_id = merged.access_id.ok_or_else(|| ConfigError::MissingVariable {
            name: VAR_UID.to_owned(),
        })?;
        let access_key = merged.access_key.ok_or_else(|| ConfigError::MissingVariable {
            name: VAR_KEY.to_owned(),
        })?;

        Ok(Self {
            credentials: CredentialPair::new(access_id, access_key),
            publish_url: merged.publish_url,
            endpoint: merged.endpoint,
        })
    }
}
