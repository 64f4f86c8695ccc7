use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;

/// Success envelope shared by every `/api` endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }

    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(message, data))
    }
}

impl ApiResponse<()> {
    pub fn empty(message: impl Into<String>) -> Json<Self> {
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;
