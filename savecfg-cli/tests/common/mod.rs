//! Shared fixtures for orchestrator tests.

#![allow(dead_code)]

use std::sync::Arc;

use savecfg_api::mock::MockTransport;
use savecfg_api::{ApiClient, Method};

pub const BASE: &str = "https://api.us2.sumologic.com/api";
pub const SOURCE_URL: &str = "https://endpoint1.collection.us2.sumologic.com/receiver/v1/http/SECRETTOKEN";

pub const ACCESS_KEYS: &str = r#"{"data": [
    {"id": "k1", "label": "ci", "createdBy": "alice", "disabled": false},
    {"id": "k2", "label": "backup", "createdBy": "bob", "disabled": true}
], "next": null}"#;

pub const TOKENS: &str = r#"{"data": [
    {"id": "t1", "name": "prod", "type": "CollectorRegistration", "status": "Active"}
]}"#;

pub const CONNECTIONS: &str = r#"{"data": [{"id": "c1", "type": "WebhookConnection", "name": "pager"}], "next": null}"#;

pub const DYNAMIC_PARSING_RULES: &str = r#"{"data": [{"id": "r1", "name": "json", "scope": "_sourceCategory=prod", "enabled": true}]}"#;

pub const MAX_USER_SESSION_TIMEOUT: &str = r#"{"maxUserSessionTimeout": "7d"}"#;

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

/// A transport answering every built-in query path with a fixture.
pub fn fixture_transport() -> MockTransport {
    MockTransport::new()
        .with_response(Method::Get, &url("/v1/accessKeys"), 200, ACCESS_KEYS)
        .with_response(Method::Get, &url("/v1/tokens"), 200, TOKENS)
        .with_response(Method::Get, &url("/v1/connections"), 200, CONNECTIONS)
        .with_response(
            Method::Get,
            &url("/v1/dynamicParsingRules"),
            200,
            DYNAMIC_PARSING_RULES,
        )
        .with_response(
            Method::Get,
            &url("/v1/policies/maxUserSessionTimeout"),
            200,
            MAX_USER_SESSION_TIMEOUT,
        )
}

pub async fn client(transport: Arc<MockTransport>) -> ApiClient {
    ApiClient::with_transport(transport, Some(BASE))
        .await
        .expect("client should build with explicit endpoint")
}
