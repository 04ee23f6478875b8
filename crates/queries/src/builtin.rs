//! Built-in queries.
//!
//! | name                             | path                                  | output |
//! |----------------------------------|---------------------------------------|--------|
//! | `accessKeys`                     | `/v1/accessKeys`                      | CSV    |
//! | `tokens`                         | `/v1/tokens`                          | CSV    |
//! | `connections`                    | `/v1/connections`                     | JSON   |
//! | `dynamicParsingRules`            | `/v1/dynamicParsingRules`             | JSON   |
//! | `policies_maxUserSessionTimeout` | `/v1/policies/maxUserSessionTimeout`  | JSON   |

use crate::passthrough::JsonQuery;
use crate::query::Query;
use crate::table::{Column, TableQuery};

/// Access keys: `date,id,name,author` from `id`, `label`, `createdBy`.
pub static ACCESS_KEYS: TableQuery = TableQuery {
    name: "accessKeys",
    path: "/v1/accessKeys",
    list_field: "data",
    columns: &[
        Column::new("id", "id"),
        Column::new("name", "label"),
        Column::new("author", "createdBy"),
    ],
};

/// Collector tokens: `date,id,name,type,status`.
pub static TOKENS: TableQuery = TableQuery {
    name: "tokens",
    path: "/v1/tokens",
    list_field: "data",
    columns: &[
        Column::new("id", "id"),
        Column::new("name", "name"),
        Column::new("type", "type"),
        Column::new("status", "status"),
    ],
};

pub static CONNECTIONS: JsonQuery = JsonQuery::new("connections", "/v1/connections");

pub static DYNAMIC_PARSING_RULES: JsonQuery =
    JsonQuery::new("dynamicParsingRules", "/v1/dynamicParsingRules");

pub static MAX_USER_SESSION_TIMEOUT: JsonQuery = JsonQuery::new(
    "policies_maxUserSessionTimeout",
    "/v1/policies/maxUserSessionTimeout",
);

/// Every built-in query.
pub fn all() -> [&'static dyn Query; 5] {
    [
        &ACCESS_KEYS,
        &TOKENS,
        &CONNECTIONS,
        &DYNAMIC_PARSING_RULES,
        &MAX_USER_SESSION_TIMEOUT,
    ]
}

/// The built-in query serving `path`.
pub fn by_path(path: &str) -> Option<&'static dyn Query> {
    all().into_iter().find(|q| q.path() == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_unique() {
        let queries = all();
        let mut paths: Vec<_> = queries.iter().map(|q| q.path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), queries.len());
    }

    #[test]
    fn by_path_finds_tokens() {
        assert_eq!(by_path("/v1/tokens").map(|q| q.name()), Some("tokens"));
        assert!(by_path("/v1/users").is_none());
    }

    #[test]
    fn table_headers() {
        assert_eq!(ACCESS_KEYS.header(), "date,id,name,author");
        assert_eq!(TOKENS.header(), "date,id,name,type,status");
    }
}
