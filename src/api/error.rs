//! Mapping of failures to HTTP responses
//!
//! Every error body is `{"error": <message>}`, with an extra `detail` field
//! for server-side failures.

use crate::error::AulaSenseError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request input (400)
    BadRequest(String),
    /// Login rejected (401)
    Unauthorized(String),
    /// Storage or generation failure (500)
    Internal { error: String, detail: String },
}

impl ApiError {
    /// Failure of the recommendation run
    pub fn generation(err: AulaSenseError) -> Self {
        ApiError::Internal {
            error: "Error interno IA".to_string(),
            detail: err.to_string(),
        }
    }
}

/// JSON body extractor whose rejections use the API error shape
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AulaSenseError> for ApiError {
    fn from(err: AulaSenseError) -> Self {
        match err {
            AulaSenseError::InvalidCredentials => {
                ApiError::Unauthorized("Credenciales incorrectas".to_string())
            }
            AulaSenseError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal {
                error: "Error interno".to_string(),
                detail: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal { error: message, detail } => {
                error!("{}: {}", message, detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message, "detail": detail })),
                )
                    .into_response()
            }
        }
    }
}
