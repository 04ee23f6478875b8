//! 쿼리 레지스트리 -- 이름 → 쿼리 모듈
//!
//! 레지스트리는 JSON 매니페스트(`{ "이름": "API 경로", ... }`)에서 만들어지며,
//! 각 경로는 [`builtin`](crate::builtin)의 쿼리로 해석됩니다.
//! 항목 순서는 매니페스트에 적힌 순서를 따릅니다.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use savecfg_core::error::{ConfigError, ManifestError, SavecfgError};

use crate::builtin;
use crate::query::Query;

/// 바이너리에 포함된 기본 매니페스트
pub const DEFAULT_MANIFEST: &str = include_str!("../../../etc/savecfg.json");

/// 모든 쿼리를 선택하는 예약어
pub const ALL: &str = "all";

/// 레지스트리 항목
pub struct RegistryEntry {
    name: String,
    path: String,
    query: &'static dyn Query,
}

impl RegistryEntry {
    /// 등록 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// API 경로
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 쿼리 모듈
    pub fn query(&self) -> &'static dyn Query {
        self.query
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// 실행할 쿼리 선택
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySelection {
    /// 등록된 모든 쿼리
    All,
    /// 이름이 일치하는 쿼리 하나
    Named(String),
}

impl QuerySelection {
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Named(value.to_owned())
        }
    }
}

impl FromStr for QuerySelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for QuerySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// 이름 순서가 보존되는 쿼리 레지스트리
#[derive(Debug)]
pub struct QueryRegistry {
    entries: Vec<RegistryEntry>,
}

impl QueryRegistry {
    /// 기본 매니페스트로 레지스트리를 만듭니다.
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::from_manifest_str(DEFAULT_MANIFEST)
    }

    /// JSON 매니페스트 문자열을 파싱합니다.
    ///
    /// # Errors
    /// - [`ManifestError::ParseFailed`]: JSON 객체가 아니거나 값이 문자열이 아님
    /// - [`ManifestError::InvalidName`]: 파일 이름으로 쓸 수 없는 이름
    /// - [`ManifestError::UnknownModule`]: 경로에 해당하는 쿼리가 없음
    /// - [`ManifestError::Empty`]: 항목이 없음
    pub fn from_manifest_str(json: &str) -> Result<Self, ManifestError> {
        let map: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| ManifestError::ParseFailed {
                reason: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(map.len());
        for (name, value) in map {
            let Value::String(path) = value else {
                return Err(ManifestError::ParseFailed {
                    reason: format!("path for '{name}' must be a string"),
                });
            };
            if !is_valid_name(&name) {
                return Err(ManifestError::InvalidName { name });
            }
            let query = builtin::by_path(&path)
                .ok_or_else(|| ManifestError::UnknownModule {
                    name: name.clone(),
                    path: path.clone(),
                })?;
            entries.push(RegistryEntry { name, path, query });
        }

        if entries.is_empty() {
            return Err(ManifestError::Empty);
        }
        debug!(queries = entries.len(), "query registry built");
        Ok(Self { entries })
    }

    /// 매니페스트 파일을 읽어 레지스트리를 만듭니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SavecfgError> {
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
        Ok(Self::from_manifest_str(&content)?)
    }

    /// 등록된 항목 (매니페스트 순서)
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// 등록된 이름 목록
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(RegistryEntry::name).collect()
    }

    /// 이름으로 항목을 찾습니다.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 선택에 해당하는 항목. 모르는 이름이면 빈 목록을 반환합니다.
    pub fn select(&self, selection: &QuerySelection) -> Vec<&RegistryEntry> {
        match selection {
            QuerySelection::All => self.entries.iter().collect(),
            QuerySelection::Named(name) => self.get(name).into_iter().collect(),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
