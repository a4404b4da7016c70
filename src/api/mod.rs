//! REST API module.
//!
//! Handlers for the JSON endpoints the website calls.

mod contact;
mod verse;

pub use contact::*;
pub use verse::*;

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;

/// Response type for handlers that can fail.
pub type ApiResult<T> = Result<T, AppError>;

/// 201 response carrying the created record.
pub type Created<T> = (StatusCode, Json<T>);

/// Create a 201 response for a newly stored record.
pub fn created<T: Serialize>(data: T) -> ApiResult<Created<T>> {
    Ok((StatusCode::CREATED, Json(data)))
}

/// Fallback for paths under /api that match no route.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
