//! Common test utilities and fixtures for the client contract tests

#![allow(dead_code, unreachable_pub)]

use serde_json::{Value, json};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// A member as the API serializes it, timestamps and all
pub fn member_json(id: u64, name: &str, status: &str) -> Value {
    json!({
        "member_id": id,
        "name": name,
        "phone": "555-0100",
        "email": null,
        "plan_type": "Monthly",
        "status": status,
        "start_date": "2024-01-01T00:00:00.000Z",
        "end_date": "2024-02-01T00:00:00.000Z"
    })
}
