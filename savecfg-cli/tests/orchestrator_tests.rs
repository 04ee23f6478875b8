//! Integration tests for the query run: artifacts, republish, delays and failures.

mod common;

use std::sync::Arc;
use std::time::Duration;

use savecfg_api::mock::MockTransport;
use savecfg_api::{Method, Publisher};
use savecfg_cli::artifact::ArtifactStore;
use savecfg_cli::orchestrator::Orchestrator;
use savecfg_core::error::SavecfgError;
use savecfg_queries::{QueryRegistry, QuerySelection, datestamp};
use tempfile::TempDir;

use common::{SOURCE_URL, client, fixture_transport, url};

async fn orchestrator(transport: Arc<MockTransport>, dir: &TempDir) -> Orchestrator {
    Orchestrator::new(
        client(transport).await,
        QueryRegistry::builtin().expect("builtin manifest"),
        ArtifactStore::new(dir.path().join("sumologic").join("config")),
    )
    .with_delay(Duration::ZERO)
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

#[tokio::test]
async fn test_run_all_writes_one_artifact_per_query() {
    // Given: every built-in path answers with a fixture
    let tmp = TempDir::new().expect("should create temp dir");
    let transport = Arc::new(fixture_transport());
    let orchestrator = orchestrator(transport.clone(), &tmp).await;

    // When: running all queries
    let summary = orchestrator
        .run(&QuerySelection::All)
        .await
        .expect("run should succeed");

    // Then: five artifacts, in manifest order, none published
    let queries: Vec<_> = summary.artifacts.iter().map(|a| a.query.as_str()).collect();
    assert_eq!(
        queries,
        vec![
            "accessKeys",
            "tokens",
            "connections",
            "dynamicParsingRules",
            "policies_maxUserSessionTimeout",
        ]
    );
    assert!(summary.artifacts.iter().all(|a| !a.published));
    assert_eq!(
        files_in(orchestrator.store().dir()),
        vec![
            "accessKeys.csv",
            "connections.csv",
            "dynamicParsingRules.csv",
            "policies_maxUserSessionTimeout.csv",
            "tokens.csv",
        ]
    );

    let today = datestamp();
    let access_keys =
        std::fs::read_to_string(orchestrator.store().path_for("accessKeys")).expect("artifact");
    assert_eq!(
        access_keys,
        format!("date,id,name,author\n{today},k1,ci,alice\n{today},k2,backup,bob\n")
    );

    let timeout: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(orchestrator.store().path_for("policies_maxUserSessionTimeout"))
            .expect("artifact"),
    )
    .expect("pass-through artifact is JSON");
    assert_eq!(timeout["maxUserSessionTimeout"], "7d");

    // one GET per query, nothing else
    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    assert!(requests.iter().all(|r| r.method == Method::Get));
}

#[tokio::test]
async fn test_run_single_query() {
    let tmp = TempDir::new().expect("should create temp dir");
    let orchestrator = orchestrator(Arc::new(fixture_transport()), &tmp).await;

    let summary = orchestrator
        .run(&QuerySelection::parse("tokens"))
        .await
        .expect("run should succeed");

    assert_eq!(summary.artifacts.len(), 1);
    let record = &summary.artifacts[0];
    assert_eq!(record.path, orchestrator.store().path_for("tokens"));
    assert_eq!(
        std::fs::read_to_string(&record.path).expect("artifact"),
        format!(
            "date,id,name,type,status\n{},t1,prod,CollectorRegistration,Active\n",
            datestamp()
        )
    );
    assert_eq!(record.bytes, std::fs::metadata(&record.path).expect("metadata").len() as usize);
}

#[tokio::test]
async fn test_run_unknown_query_is_a_no_op() {
    // Given: a name that is not registered
    let tmp = TempDir::new().expect("should create temp dir");
    let transport = Arc::new(fixture_transport());
    let orchestrator = orchestrator(transport.clone(), &tmp).await;

    // When
    let summary = orchestrator
        .run(&QuerySelection::parse("users"))
        .await
        .expect("unknown name is not an error here");

    // Then: no queries, no artifacts, no requests
    assert!(summary.artifacts.is_empty());
    assert!(files_in(orchestrator.store().dir()).is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_run_republishes_each_artifact_with_category() {
    // Given: a publisher sharing the mock transport
    let tmp = TempDir::new().expect("should create temp dir");
    let transport = Arc::new(fixture_transport().with_response(Method::Post, SOURCE_URL, 200, ""));
    let publisher = Publisher::with_transport(transport.clone(), SOURCE_URL);
    let orchestrator = orchestrator(transport.clone(), &tmp)
        .await
        .with_publisher(Some(publisher));

    // When
    let summary = orchestrator
        .run(&QuerySelection::All)
        .await
        .expect("run should succeed");

    // Then: every artifact posted once, body equal to the file
    assert!(summary.artifacts.iter().all(|a| a.published));

    let posts: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Post)
        .collect();
    assert_eq!(posts.len(), 5);

    for (post, record) in posts.iter().zip(&summary.artifacts) {
        assert_eq!(post.url, SOURCE_URL);
        assert_eq!(
            post.header("X-Sumo-Category"),
            Some(format!("sumologic/config/{}", record.query).as_str())
        );
        assert_eq!(post.header("Content-Type"), Some("text/csv"));
        let file = std::fs::read(&record.path).expect("artifact");
        assert_eq!(post.body.as_deref(), Some(file.as_slice()));
    }

    // GET then POST for each query
    let methods: Vec<_> = transport.requests().iter().map(|r| r.method).collect();
    assert_eq!(&methods[..4], &[Method::Get, Method::Post, Method::Get, Method::Post]);
}

#[tokio::test]
async fn test_run_aborts_on_api_error() {
    // Given: tokens (the second query) fails
    let tmp = TempDir::new().expect("should create temp dir");
    let transport = Arc::new(fixture_transport().with_response(
        Method::Get,
        &url("/v1/tokens"),
        500,
        "internal server error: token service",
    ));
    let orchestrator = orchestrator(transport.clone(), &tmp).await;

    // When
    let err = orchestrator
        .run(&QuerySelection::All)
        .await
        .expect_err("api failure should abort the run");

    // Then: the body is in the error, the first artifact stays, nothing after runs
    match err {
        SavecfgError::Api(api) => {
            assert_eq!(api.status(), Some(500));
            assert!(api.to_string().contains("internal server error: token service"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
    assert_eq!(files_in(orchestrator.store().dir()), vec!["accessKeys.csv"]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_run_aborts_on_republish_rejection() {
    let tmp = TempDir::new().expect("should create temp dir");
    let transport =
        Arc::new(fixture_transport().with_response(Method::Post, SOURCE_URL, 401, "bad source token"));
    let publisher = Publisher::with_transport(transport.clone(), SOURCE_URL);
    let orchestrator = orchestrator(transport.clone(), &tmp)
        .await
        .with_publisher(Some(publisher));

    let err = orchestrator
        .run(&QuerySelection::All)
        .await
        .expect_err("publish failure should abort the run");

    assert!(err.to_string().contains("bad source token"));
    assert!(
        !err.to_string().contains("SECRETTOKEN"),
        "source token must not reach the error message"
    );
    // artifact written before the publish attempt
    assert_eq!(files_in(orchestrator.store().dir()), vec!["accessKeys.csv"]);
}

#[tokio::test(start_paused = true)]
async fn test_run_pauses_only_between_queries() {
    let tmp = TempDir::new().expect("should create temp dir");
    let delay = Duration::from_millis(500);
    let orchestrator = orchestrator(Arc::new(fixture_transport()), &tmp)
        .await
        .with_delay(delay);

    let started = tokio::time::Instant::now();
    orchestrator
        .run(&QuerySelection::parse("tokens"))
        .await
        .expect("run should succeed");
    assert!(started.elapsed() < delay, "a single query should not wait");

    let started = tokio::time::Instant::now();
    orchestrator
        .run(&QuerySelection::All)
        .await
        .expect("run should succeed");
    let elapsed = started.elapsed();
    assert!(elapsed >= delay * 4, "four pauses between five queries");
    assert!(elapsed < delay * 5, "no pause after the last query");
}
