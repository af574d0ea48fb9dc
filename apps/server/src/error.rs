use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use avery_sync_core::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotConfigured(_) | Error::InvalidInput(_) => Self::BadRequest(err.to_string()),
            Error::SourceUnavailable(_) | Error::Remote { .. } => Self::BadGateway(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::BadGateway(message) => {
                tracing::warn!("upstream failure: {}", message);
                (StatusCode::BAD_GATEWAY, message)
            }
            ApiError::Internal(message) => {
                tracing::error!("internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
