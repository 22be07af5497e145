//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p fylz-api`. Storage is the
//! in-memory backend, so no bucket or credentials are needed.

#![allow(dead_code)]

use axum_test::TestServer;
use fylz_api::setup::routes;
use fylz_api::state::AppState;
use fylz_core::Config;
use fylz_storage::{MemoryStorage, Storage};
use std::sync::Arc;

/// Test application: server plus a handle on the store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: MemoryStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test app over an empty in-memory bucket.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(MemoryStorage::new("test-bucket"))
}

/// Setup test app over a pre-built store (custom page size, seeded keys).
pub fn setup_test_app_with(storage: MemoryStorage) -> TestApp {
    setup_test_app_with_config(storage, Config::default())
}

/// Setup test app with an explicit configuration (e.g. production mode).
pub fn setup_test_app_with_config(storage: MemoryStorage, config: Config) -> TestApp {
    let backend: Arc<dyn Storage> = Arc::new(storage.clone());
    let state = Arc::new(AppState::new(config.clone(), backend));
    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp { server, storage }
}

/// Upload `data` as `filename` through the raw endpoint and return the id.
pub async fn upload(client: &TestServer, filename: &str, data: &'static [u8]) -> String {
    let response = client
        .post(&format!("/files/{}", filename))
        .bytes(bytes::Bytes::from_static(data))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    body.get("id")
        .and_then(|v| v.as_str())
        .expect("Expected 'id' in upload response")
        .to_string()
}
