//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use ephembin_server::{create_app, AppState, Config, PasteStore};
use std::sync::Arc;

pub(crate) fn test_config() -> Config {
    Config {
        port: 0,
        max_paste_size: 4096,
        sweep_interval_secs: 30,
        base_url: Some("http://paste.test".to_string()),
    }
}

pub(crate) fn setup_test_server() -> (TestServer, Arc<PasteStore>) {
    let store = Arc::new(PasteStore::new());
    let state = AppState::new(test_config(), Arc::clone(&store));
    let app = create_app(state, false);
    let server = TestServer::new(app).expect("server");
    (server, store)
}
