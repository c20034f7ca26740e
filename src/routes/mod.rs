use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub mod discover;
pub mod feedback;
pub mod movie;
pub mod people;
pub mod search;
pub mod trending;
pub mod tv;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "message": "API is healthy" })))
}

/// Unknown route
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route not found" })))
}
