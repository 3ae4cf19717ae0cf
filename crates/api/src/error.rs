//! API error responses

use aml_oracle_chain::ChainError;
use aml_oracle_core::ValidationError;
use aml_oracle_signer::SignerError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Everything a handler can fail with, rendered as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Chain(ChainError::Signing(_)) | ApiError::Chain(ChainError::Config(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Chain(_) => StatusCode::BAD_GATEWAY,
            ApiError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Admin request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Admin request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(ValidationError::EmptyBatch).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ChainError::rejected(5, "unauthorized")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(ChainError::Status {
                status: 503,
                body: String::new()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(SignerError::Signature("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ApiError::from(ValidationError::EmptyWallet);
        assert_eq!(err.to_string(), "wallet is required");
    }
}
