//! Success response envelope
//!
//! Every successful handler response is wrapped as
//! `{ "success": true, "data": ... }` so clients can branch on a single
//! shape for both outcomes (failures use the error envelope in `error`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrap `data` in the success envelope with the given status
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

/// 200 OK success envelope
pub fn ok<T: Serialize>(data: T) -> Response {
    success(StatusCode::OK, data)
}

/// 201 Created success envelope
pub fn created<T: Serialize>(data: T) -> Response {
    success(StatusCode::CREATED, data)
}
