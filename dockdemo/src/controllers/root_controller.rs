use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/hello", get(hello))
        .route("/api/health", get(api_health))
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "Hello, world!" }))
}

async fn hello(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "message": format!("Hello from {}!", config.app_name),
        "framework": "axum",
        "status": "success",
        "timestamp": chrono::Utc::now().timestamp_millis(),
    }))
}

async fn api_health() -> Json<Value> {
    dockdemo_core::health::healthy_body()
}
