//! HTTP handlers grouped by resource.
//!
//! Successful responses use the `{"message": "success", "data": ...}`
//! envelope expected by the mobile client.

pub mod health;
pub mod registrations;
pub mod users;
pub mod workshops;

use axum::Json;
use serde::Serialize;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: &'static str,
    pub data: T,
}

pub(crate) fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        message: "success",
        data,
    })
}

/// Body for delete endpoints.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: String,
}
