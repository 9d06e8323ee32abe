//! Store-free benchmark endpoints.

use axum::Json;
use serde_json::{json, Value};

pub async fn plaintext() -> &'static str {
    "Hello, World!"
}

pub async fn json() -> Json<Value> {
    Json(json!({"message": "Hello, World!"}))
}
