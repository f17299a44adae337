use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{message}")]
    InvalidInput {
        message: String,
        errors: Option<Value>,
    },
}

impl AppError {
    pub fn folder_not_found() -> Self {
        AppError::NotFound("Folder".into())
    }

    pub fn invalid(message: impl Into<String>, errors: Option<Value>) -> Self {
        AppError::InvalidInput {
            message: message.into(),
            errors,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Config(_) => {
                error!(error = %self, "request failed");
                ApiResponse::error("Internal server error", None)
            }
            AppError::Database(_) => {
                error!(error = %self, "store read failed");
                ApiResponse::error("Storage unavailable", None)
            }
            AppError::NotFound(_) => {
                warn!(error = %self, "lookup missed");
                ApiResponse::error(self.to_string(), None)
            }
            AppError::InvalidInput { message, errors } => {
                ApiResponse::error(message.clone(), errors.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::json;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn not_found_uses_error_envelope() {
        let (status, body) = body_of(AppError::folder_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "message": "Folder not found"}));
    }

    #[actix_web::test]
    async fn invalid_input_carries_details() {
        let err = AppError::invalid("Invalid id", Some(json!({"id": ["Invalid UUID"]})));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid id");
        assert_eq!(body["errors"]["id"][0], "Invalid UUID");
    }

    #[actix_web::test]
    async fn store_failures_hide_internals() {
        let (status, body) = body_of(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "Storage unavailable");
        assert!(body.get("errors").is_none());
    }
}
