//! Command handlers -- one module per mode

pub mod list;
pub mod run;

use std::path::Path;

use savecfg_core::error::SavecfgError;
use savecfg_queries::QueryRegistry;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Route to `--list` or a query run.
pub async fn dispatch(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    if cli.list {
        list::execute(cli.manifest.as_deref(), writer).await
    } else {
        run::execute(cli, writer).await
    }
}

/// The registry from `--manifest`, or the built-in one.
pub async fn load_registry(manifest: Option<&Path>) -> Result<QueryRegistry, SavecfgError> {
    match manifest {
        Some(path) => QueryRegistry::load(path).await,
        None => Ok(QueryRegistry::builtin()?),
    }
}
