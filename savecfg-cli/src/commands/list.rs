//! `savecfg --list` handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use savecfg_queries::QueryRegistry;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Width the query name is padded to in text output.
const NAME_WIDTH: usize = 60;

/// Print every registered query with its API path. No credentials needed.
pub async fn execute(manifest: Option<&Path>, writer: &OutputWriter) -> Result<(), CliError> {
    let registry = super::load_registry(manifest).await?;
    writer.render(&QueryListReport::from(&registry))
}

/// Registered queries, in manifest order.
#[derive(Debug, Serialize)]
pub struct QueryListReport {
    pub queries: Vec<QueryListItem>,
}

#[derive(Debug, Serialize)]
pub struct QueryListItem {
    pub name: String,
    pub path: String,
}

impl From<&QueryRegistry> for QueryListReport {
    fn from(registry: &QueryRegistry) -> Self {
        Self {
            queries: registry
                .entries()
                .iter()
                .map(|e| QueryListItem {
                    name: e.name().to_owned(),
                    path: e.path().to_owned(),
                })
                .collect(),
        }
    }
}

impl Render for QueryListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for item in &self.queries {
            writeln!(
                w,
                "Query: {:<width$} URLPath: {}",
                item.name,
                item.path,
                width = NAME_WIDTH
            )?;
        }
        Ok(())
    }
}
