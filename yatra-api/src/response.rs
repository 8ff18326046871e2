use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Uniform response envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        count: None,
        message: None,
    })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// Listing responses carry a `count` alongside the data.
pub fn ok_list<T: Serialize>(items: Vec<T>) -> Json<ApiResponse<Vec<T>>> {
    let count = items.len();
    Json(ApiResponse {
        success: true,
        data: Some(items),
        count: Some(count),
        message: None,
    })
}
