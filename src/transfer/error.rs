//! HTTP error mapping for the transfer endpoint.
//!
//! Domain errors are converted to status codes here and nowhere else:
//! validation failures map to 400, missing resources to 404, oversized
//! uploads to 413, and everything the client cannot fix to 500. Internal
//! detail is logged but never sent to the client.

use actix_web::{HttpResponse, error::ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::media::error::MediaStoreError;
use crate::message::{error::ValidationError, services::send::SendError};

/// Result type for transfer handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request shape was malformed before reaching the domain.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A domain validation rule rejected the request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An uploaded payload exceeded the configured limit.
    #[error("payload of {actual_bytes} bytes exceeds limit of {limit_bytes}")]
    PayloadTooLarge {
        /// Size of the rejected payload.
        actual_bytes: usize,
        /// The configured limit.
        limit_bytes: usize,
    },

    /// A backend failure the client cannot act on.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SendError> for ApiError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::Validation(e) => Self::Validation(e),
            SendError::Media(e) => Self::from(e),
            SendError::Repository(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<MediaStoreError> for ApiError {
    fn from(err: MediaStoreError) -> Self {
        match err {
            MediaStoreError::NotFound(image_ref) => Self::NotFound(image_ref.to_string()),
            MediaStoreError::TooLarge {
                actual_bytes,
                limit_bytes,
            } => Self::PayloadTooLarge {
                actual_bytes,
                limit_bytes,
            },
            MediaStoreError::EmptyContent => Self::BadRequest("image content is empty".to_owned()),
            MediaStoreError::InvalidReference(e) => Self::BadRequest(e.to_string()),
            MediaStoreError::Io(e) => Self::Internal(e.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "error": body }))
    }
}
