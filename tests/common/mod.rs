#![allow(dead_code)]

use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use shortstat::application::services::LinkService;
use shortstat::infrastructure::persistence::JsonFileEntryRepository;
use shortstat::routes::router;
use shortstat::state::AppState;
use shortstat::web::session::key_from_secret;

pub const BASE_URL: &str = "http://sho.rt";

pub fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("url_stats.json")
}

pub async fn create_test_service(dir: &TempDir) -> LinkService<JsonFileEntryRepository> {
    let repository = JsonFileEntryRepository::open(store_path(dir))
        .await
        .unwrap();
    LinkService::new(Arc::new(repository))
}

pub async fn create_test_state(dir: &TempDir) -> AppState {
    let service = create_test_service(dir).await;
    let session_key = key_from_secret(b"test-session-secret").unwrap();

    AppState::new(Arc::new(service), BASE_URL.to_string(), session_key)
}

pub async fn create_test_server(dir: &TempDir) -> (TestServer, AppState) {
    let state = create_test_state(dir).await;
    let server = TestServer::new(router(state.clone())).unwrap();
    (server, state)
}

pub async fn read_store(dir: &TempDir) -> serde_json::Value {
    let bytes = tokio::fs::read(store_path(dir)).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
