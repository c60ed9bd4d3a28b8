#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use warehouse_portal::controllers::user::UserController;
use warehouse_portal::core::state::AppState;
use warehouse_portal::core::store::{MemoryStorage, Storage};
use warehouse_portal::routes::guard::Landing;

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

/// Signs with a key the client never sees, like the real backend.
pub fn mint(sub: &str, exp: i64, role: Option<&str>) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &TestClaims { sub, exp, role },
        &jsonwebtoken::EncodingKey::from_secret(b"backend-only-secret"),
    )
    .unwrap()
}

pub fn live(sub: &str, role: Option<&str>) -> String {
    mint(sub, Utc::now().timestamp() + 3600, role)
}

pub fn app(base_url: &str, storage: Arc<dyn Storage>) -> AppState {
    AppState::with_storage(
        storage,
        UserController::new(base_url).unwrap(),
        Landing::default(),
        Duration::from_secs(5),
    )
}

pub fn memory() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}
