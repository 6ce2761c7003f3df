// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ironlog::config::Config;
use ironlog::db::FirestoreDb;
use ironlog::routes::create_router;
use ironlog::services::ChatService;
use ironlog::AppState;
use std::sync::Arc;

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies and chat disabled.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_chat(ChatService::disabled())
}

/// Create a test app with a caller-supplied chat service (mock model).
#[allow(dead_code)]
pub fn create_test_app_with_chat(chat: ChatService) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let state = Arc::new(AppState { config, db, chat });

    (create_router(state.clone()), state)
}

/// Create a session token accepted by the test app.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    ironlog::middleware::auth::create_session_token(user_id, signing_key)
        .expect("Failed to create test token")
}
