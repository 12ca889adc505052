use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Json body extractor whose rejections surface as `AppError::BadRequest`
/// (a 400 with a JSON error body) instead of axum's plain-text defaults.
#[derive(Debug, Clone, axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: serde::Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
