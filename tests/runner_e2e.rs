//! Full catalog runs through a loopback tunnel in front of the real backend

mod common;

use std::time::Duration;
use tokio_test::assert_ok;

use trabas_e2e::config::RunnerConfig;
use trabas_e2e::executor::TestRunner;
use trabas_e2e::models::FailureKind;
use trabas_e2e::output::exit_status;
use trabas_e2e::scenarios::ScenarioCatalog;

const CLIENT_ID: &str = "e2e-test-client";

fn config(server_url: &str) -> RunnerConfig {
    RunnerConfig {
        server_url: server_url.to_string(),
        client_id: CLIENT_ID.to_string(),
        timeout_secs: 5,
        grace_secs: 0,
        ..Default::default()
    }
}

#[test]
fn test_tunnel_fixture_splits_targets() {
    assert_eq!(
        common::split_target("/client-a/status/201"),
        Some(("client-a".to_string(), "/status/201".to_string()))
    );
    assert_eq!(
        common::split_target("/ping?trabas_client_id=client-a"),
        Some(("client-a".to_string(), "/ping".to_string()))
    );
    assert_eq!(
        common::split_target("/search?q=1&trabas_client_id=c"),
        Some(("c".to_string(), "/search?q=1".to_string()))
    );
}

#[tokio::test]
async fn test_standard_catalog_passes_through_tunnel() {
    let backend = common::spawn_backend().await;
    let tunnel = common::spawn_tunnel(CLIENT_ID, &backend.url).await;

    let runner = assert_ok!(TestRunner::new(&config(&tunnel.url)));
    let catalog = ScenarioCatalog::standard();
    let summary = runner.run(&catalog).await;

    let failures: Vec<String> = summary.failures().map(|r| r.to_string()).collect();
    assert!(failures.is_empty(), "failed scenarios: {failures:#?}");
    assert_eq!(summary.total, catalog.len());
    assert_eq!(summary.passed + summary.failed, summary.total);
    assert!(summary.success);
    assert_eq!(exit_status(&summary), 0);

    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    let expected: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_slow_scenario_timing_is_recorded() {
    let backend = common::spawn_backend().await;
    let tunnel = common::spawn_tunnel(CLIENT_ID, &backend.url).await;

    let runner = TestRunner::new(&config(&tunnel.url)).unwrap();
    let catalog = ScenarioCatalog::standard();
    let slow = catalog.get("Slow request handling").unwrap();

    let result = runner.run_scenario(slow).await;
    assert!(result.passed(), "{result}");
    assert!(result.duration_ms >= 1000);
}

#[tokio::test]
async fn test_wrong_client_id_fails_every_positive_scenario() {
    let backend = common::spawn_backend().await;
    let tunnel = common::spawn_tunnel("someone-else", &backend.url).await;

    let runner = TestRunner::new(&config(&tunnel.url)).unwrap();
    let summary = runner.run(&ScenarioCatalog::standard()).await;

    // The tunnel answers 404 for every request, which only the negative
    // addressing scenario accepts.
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, summary.total - 1);
    assert!(summary.results.last().unwrap().passed());
    assert!(summary
        .failures()
        .all(|r| r.failure_kind() == Some(FailureKind::AssertionMismatch)));
    assert_eq!(exit_status(&summary), 1);
}

#[tokio::test]
async fn test_unreachable_tunnel() {
    let runner = TestRunner::new(&config(&common::closed_port_url()))
        .unwrap()
        .with_grace_period(Duration::ZERO);
    let summary = runner.run(&ScenarioCatalog::standard()).await;

    assert_eq!(summary.total, 13);
    assert_eq!(summary.passed, 1);
    assert_eq!(
        summary.results.last().map(|r| r.name.as_str()),
        Some("Non-existent client ID")
    );
    assert!(summary
        .failures()
        .all(|r| r.failure_kind() == Some(FailureKind::UnexpectedTransport)));
    assert!(!summary.success);
    assert_eq!(exit_status(&summary), 1);
}
