//! Pass-through queries: the response is emitted as pretty-printed JSON.

use serde_json::Value;

use savecfg_core::error::QueryError;

use crate::query::Query;

/// A query whose output is the response body itself.
#[derive(Debug)]
pub struct JsonQuery {
    pub name: &'static str,
    pub path: &'static str,
}

impl JsonQuery {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self { name, path }
    }
}

impl Query for JsonQuery {
    fn name(&self) -> &str {
        self.name
    }

    fn path(&self) -> &str {
        self.path
    }

    fn format(&self, body: &Value, _datestamp: &str) -> Result<String, QueryError> {
        let mut out = serde_json::to_string_pretty(body).map_err(|e| QueryError::Render {
            query: self.name.to_owned(),
            reason: e.to_string(),
        })?;
        out.push('\n');
        Ok(out)
    }
}
