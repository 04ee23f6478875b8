//! CSV projection of a JSON list.
//!
//! A [`TableQuery`] reads the list under `list_field` and emits one header
//! line plus one line per record. Every line starts with the date stamp
//! and ends with a newline. Fields are joined with plain commas and are
//! not quoted.

use serde_json::Value;

use savecfg_core::error::QueryError;

use crate::query::Query;

/// Title of the leading date column.
pub const DATE_COLUMN: &str = "date";

/// One output column: header title and the record field it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub field: &'static str,
}

impl Column {
    pub const fn new(title: &'static str, field: &'static str) -> Self {
        Self { title, field }
    }
}

/// A query whose output is a CSV table.
#[derive(Debug)]
pub struct TableQuery {
    pub name: &'static str,
    pub path: &'static str,
    /// Field of the response object holding the record list.
    pub list_field: &'static str,
    pub columns: &'static [Column],
}

impl TableQuery {
    /// Header line, without the trailing newline.
    pub fn header(&self) -> String {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(|c| c.title))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn row(&self, index: usize, record: &Value, datestamp: &str) -> Result<String, QueryError> {
        let mut cells = Vec::with_capacity(self.columns.len() + 1);
        cells.push(datestamp.to_owned());
        for column in self.columns {
            let value = record
                .get(column.field)
                .ok_or_else(|| QueryError::MissingField {
                    query: self.name.to_owned(),
                    index,
                    field: column.field.to_owned(),
                })?;
            cells.push(cell(value));
        }
        Ok(cells.join(","))
    }
}

/// Strings verbatim, null as empty, anything else as compact JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Query for TableQuery {
    fn name(&self) -> &str {
        self.name
    }

    fn path(&self) -> &str {
        self.path
    }

    fn format(&self, body: &Value, datestamp: &str) -> Result<String, QueryError> {
        let records = body
            .get(self.list_field)
            .and_then(Value::as_array)
            .ok_or_else(|| QueryError::MissingList {
                query: self.name.to_owned(),
                field: self.list_field.to_owned(),
            })?;

        let mut out = self.header();
        out.push('\n');
        for (index, record) in records.iter().enumerate() {
            out.push_str(&self.row(index, record, datestamp)?);
            out.push('\n');
        }
        Ok(out)
    }
}
