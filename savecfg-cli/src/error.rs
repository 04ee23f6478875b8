//! CLI-specific error types and exit code mapping

use savecfg_core::error::{ApiError, ConfigError, SavecfgError};

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The requested query is not in the registry.
    #[error("unknown query '{name}' (registered: {registered})")]
    UnknownQuery { name: String, registered: String },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from the library crates.
    #[error("{0}")]
    Core(#[from] SavecfgError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | API failure / general error          |
    /// | 2    | Configuration or manifest error      |
    /// | 3    | Unknown query name                   |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownQuery { .. } => 3,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) => 1,
            Self::Core(inner) => match inner {
                SavecfgError::Config(_) | SavecfgError::Manifest(_) => 2,
                SavecfgError::Io(_) => 10,
                SavecfgError::Api(_) | SavecfgError::Query(_) => 1,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Core(e.into())
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Core(e.into())
    }
}
