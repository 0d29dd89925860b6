/*
 * Responsibility
 * - App-wide AppError definition
 * - IntoResponse (HTTP status / JSON error body)
 * - Convert extractor / store errors into one shape
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::ApiKeyError;
use crate::services::auth::api_key::API_KEY_SCHEME;
use crate::services::auth::credential_store::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    ApiKey(#[from] ApiKeyError),
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ApiKey(ApiKeyError::NoAuthHeader) => {
                (StatusCode::UNAUTHORIZED, "NO_AUTH_HEADER")
            }
            AppError::ApiKey(ApiKeyError::MalformedHeader) => {
                (StatusCode::UNAUTHORIZED, "MALFORMED_AUTH_HEADER")
            }
            AppError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "INVALID_API_KEY"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(API_KEY_SCHEME),
            );
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(_: StoreError) -> Self {
        AppError::Internal
    }
}
