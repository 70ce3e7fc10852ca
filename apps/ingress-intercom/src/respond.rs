use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// 200 with the turn status once every reply of the turn settled.
pub fn ack(request_id: &str, status: &str) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "ok": true, "request_id": request_id, "status": status })),
    )
}

pub fn failure(code: StatusCode, request_id: &str, error: &str) -> impl IntoResponse {
    (
        code,
        Json(json!({ "ok": false, "request_id": request_id, "error": error })),
    )
}
