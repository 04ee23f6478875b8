//! Query run handler (the default mode)

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use savecfg_api::{ApiClient, Publisher, redact_url};
use savecfg_core::config::{Settings, SettingsLayer};
use savecfg_core::error::ConfigError;
use savecfg_core::types::CredentialPair;
use savecfg_queries::{QueryRegistry, QuerySelection};

use crate::artifact::ArtifactStore;
use crate::cli::Cli;
use crate::error::CliError;
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::output::{OutputWriter, Render};

/// Resolve settings, connect, run the selected queries and report.
///
/// # Errors
///
/// - `CliError::UnknownQuery` before any credential lookup or request
/// - `ConfigError` for a malformed `--secret`, an unreadable `--config`
///   file or a missing credential
/// - the first API, I/O or republish failure of the run
pub async fn execute(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    let registry = super::load_registry(cli.manifest.as_deref()).await?;
    let selection = QuerySelection::parse(&cli.query);
    check_selection(&registry, &selection)?;

    let settings = resolve_settings(&cli).await?;
    let client =
        ApiClient::connect(&settings.credentials, settings.endpoint.as_deref()).await?;
    info!(endpoint = %client.endpoint(), "connected");

    let publisher = match settings.publish_url.as_deref() {
        Some(url) => {
            debug!(url = %redact_url(url), "republish enabled");
            Some(Publisher::new(url)?)
        }
        None => None,
    };

    let store = ArtifactStore::new(cli.cache_dir.unwrap_or_else(ArtifactStore::default_dir));
    let orchestrator = Orchestrator::new(client, registry, store)
        .with_publisher(publisher)
        .with_delay(Duration::from_millis(cli.delay_ms));

    let summary = orchestrator.run(&selection).await?;
    writer.render(&RunReport::new(orchestrator.store().dir(), &summary))
}

/// Reject a query name that is not registered.
pub fn check_selection(
    registry: &QueryRegistry,
    selection: &QuerySelection,
) -> Result<(), CliError> {
    match selection {
        QuerySelection::Named(name) if !registry.contains(name) => Err(CliError::UnknownQuery {
            name: name.clone(),
            registered: registry.names().join(", "),
        }),
        _ => Ok(()),
    }
}

/// Settings layer from command-line flags.
pub fn cli_layer(cli: &Cli) -> Result<SettingsLayer, ConfigError> {
    let mut layer = SettingsLayer {
        publish_url: cli.url.clone().filter(|v| !v.is_empty()),
        endpoint: cli.endpoint.clone().filter(|v| !v.is_empty()),
        ..SettingsLayer::default()
    };
    if let Some(secret) = &cli.secret {
        layer = layer.with_credentials(secret.parse::<CredentialPair>()?);
    }
    Ok(layer)
}

/// Merge flags, the `--config` file and the environment.
pub async fn resolve_settings(cli: &Cli) -> Result<Settings, CliError> {
    let flags = cli_layer(cli)?;
    let file = match &cli.config {
        Some(path) => Some(SettingsLayer::from_file(path).await?),
        None => None,
    };
    Ok(Settings::resolve(flags, file, SettingsLayer::from_env())?)
}

/// Artifacts produced by a run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub cache_dir: PathBuf,
    pub artifacts: Vec<ArtifactReport>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactReport {
    pub query: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub published: bool,
}

impl RunReport {
    pub fn new(cache_dir: &std::path::Path, summary: &RunSummary) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            artifacts: summary
                .artifacts
                .iter()
                .map(|a| ArtifactReport {
                    query: a.query.clone(),
                    path: a.path.clone(),
                    bytes: a.bytes,
                    published: a.published,
                })
                .collect(),
        }
    }
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.artifacts.is_empty() {
            return writeln!(w, "No queries ran.");
        }
        for a in &self.artifacts {
            let published = if a.published { "  published" } else { "" };
            writeln!(
                w,
                "{:<32} {:>8} bytes  {}{}",
                a.query,
                a.bytes,
                a.path.display(),
                published
            )?;
        }
        Ok(())
    }
}
