mod common;

use axum::http::StatusCode;
use tempfile::TempDir;

#[tokio::test]
async fn test_health_reports_store() {
    let dir = TempDir::new().unwrap();
    let (server, state) = common::create_test_server(&dir).await;

    state
        .link_service
        .shorten_or_reuse("https://example.com")
        .await
        .unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["message"], "1 entries");
}

#[tokio::test]
async fn test_health_degraded_when_store_path_blocked() {
    let dir = TempDir::new().unwrap();
    let (server, _state) = common::create_test_server(&dir).await;

    std::fs::create_dir(common::store_path(&dir)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
}
