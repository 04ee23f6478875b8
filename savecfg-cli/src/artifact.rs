//! Artifact cache directory.
//!
//! Every query writes one file, `<dir>/<query name>.csv`, overwriting the
//! previous run's file. The extension is `.csv` for pass-through JSON
//! queries too.

use std::path::{Path, PathBuf};

use tracing::debug;

use savecfg_core::error::SavecfgError;

/// Extension of every artifact file.
pub const ARTIFACT_EXTENSION: &str = "csv";

/// Directory holding query artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<system temp dir>/sumologic/config`
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("sumologic").join("config")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact path for a query name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{ARTIFACT_EXTENSION}"))
    }

    /// Create the directory and its parents if missing.
    pub async fn ensure_dir(&self) -> Result<(), SavecfgError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write (or overwrite) the artifact for `name` and return its path.
    pub async fn write(&self, name: &str, contents: &str) -> Result<PathBuf, SavecfgError> {
        let path = self.path_for(name);
        tokio::fs::write(&path, contents).await?;
        debug!(query = name, path = %path.display(), bytes = contents.len(), "artifact written");
        Ok(path)
    }

    /// Read back the artifact for `name`.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, SavecfgError> {
        Ok(tokio::fs::read(self.path_for(name)).await?)
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}
