//! Query orchestration -- selection, artifacts, republish.
//!
//! The [`Orchestrator`] runs the selected registry entries strictly in
//! order, one at a time:
//!
//! 1. run the query against the shared [`ApiClient`]
//! 2. write the output to `<cache dir>/<name>.csv`
//! 3. if a [`Publisher`] is configured, post the artifact file under the
//!    source category `sumologic/config/<name>`
//! 4. pause before the next query
//!
//! The first failure aborts the run. Artifacts written before the
//! failure stay on disk.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use savecfg_api::{ApiClient, Publisher};
use savecfg_core::error::SavecfgError;
use savecfg_queries::{QueryRegistry, QuerySelection, RegistryEntry};

use crate::artifact::ArtifactStore;

/// Default pause between consecutive queries, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Default pause between consecutive queries.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_DELAY_MS);

/// Prefix of every republish source category.
pub const CATEGORY_BASE: &str = "sumologic/config";

/// Source category for a query's republished artifact.
pub fn source_category(query_name: &str) -> String {
    format!("{CATEGORY_BASE}/{query_name}")
}

/// Outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub query: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub published: bool,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub artifacts: Vec<ArtifactRecord>,
}

/// Runs registry entries against one client.
pub struct Orchestrator {
    client: ApiClient,
    registry: QueryRegistry,
    store: ArtifactStore,
    publisher: Option<Publisher>,
    delay: Duration,
}

impl Orchestrator {
    pub fn new(client: ApiClient, registry: QueryRegistry, store: ArtifactStore) -> Self {
        Self {
            client,
            registry,
            store,
            publisher: None,
            delay: DEFAULT_DELAY,
        }
    }

    /// Republish each artifact through `publisher`.
    pub fn with_publisher(mut self, publisher: Option<Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Pause between consecutive queries.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run every entry matching `selection`.
    ///
    /// A name that matches nothing runs zero queries and returns an empty
    /// summary. Callers that want to reject unknown names check the
    /// registry first.
    ///
    /// # Errors
    ///
    /// The first API, formatting, I/O or republish failure.
    pub async fn run(&self, selection: &QuerySelection) -> Result<RunSummary, SavecfgError> {
        let entries = self.registry.select(selection);
        if entries.is_empty() {
            warn!(selection = %selection, "no registered query matches");
            return Ok(RunSummary::default());
        }

        self.store.ensure_dir().await?;
        info!(
            queries = entries.len(),
            cache_dir = %self.store.dir().display(),
            publish = self.publisher.is_some(),
            "run started"
        );

        let mut summary = RunSummary::default();
        for (index, entry) in entries.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            summary.artifacts.push(self.run_one(entry).await?);
        }

        info!(artifacts = summary.artifacts.len(), "run finished");
        Ok(summary)
    }

    async fn run_one(&self, entry: &RegistryEntry) -> Result<ArtifactRecord, SavecfgError> {
        let name = entry.name();
        info!(query = name, path = entry.path(), "running query");

        let output = entry.query().get_and_format_output(&self.client).await?;
        let path = self.store.write(name, &output).await?;

        let category = source_category(name);
        debug!(query = name, category = %category, "source category");
        trace!(query = name, output = %output, "query output");

        let published = match &self.publisher {
            Some(publisher) => {
                let payload = self.store.read(name).await?;
                publisher.publish(payload, &category).await?;
                true
            }
            None => false,
        };

        Ok(ArtifactRecord {
            query: name.to_owned(),
            path,
            bytes: output.len(),
            published,
        })
    }
}
