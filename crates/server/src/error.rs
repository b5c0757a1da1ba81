use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("kind must be 'income' or 'expense', got '{0}'")]
    InvalidKind(String),

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("transaction not found: {0}")]
    TransactionNotFound(i64),

    #[error("budget limit not found: {0}")]
    BudgetLimitNotFound(String),

    #[error("statement upload is missing a 'file' part")]
    MissingFilePart,

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidKind(_)
            | ApiError::NonPositiveAmount
            | ApiError::MissingFilePart
            | ApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::TransactionNotFound(_) | ApiError::BudgetLimitNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
