//! Error types for the validation boundary and the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Reasons a prediction request is rejected before scoring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("At least one transaction is required")]
    EmptyBatch,

    #[error("Too many transactions: {size} (maximum {max})")]
    BatchTooLarge { size: usize, max: usize },

    #[error("transactions[{index}].amount: Amount must be a positive number")]
    InvalidAmount { index: usize },

    #[error("transactions[{index}].currency: Currency must be one of: {supported}")]
    UnsupportedCurrency { index: usize, supported: String },

    #[error("transactions[{index}].merchantId: Merchant identifier must not be empty")]
    EmptyMerchantId { index: usize },

    #[error("transactions[{index}].paymentMethod: Payment method must be one of: {supported}")]
    UnsupportedPaymentMethod { index: usize, supported: String },

    #[error("transactions[{index}].customerEmail: Invalid email format")]
    InvalidEmail { index: usize },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal server error: {context}")]
    Internal { context: String },
}

impl AppError {
    pub fn internal(context: impl Into<String>) -> Self {
        Self::Internal {
            context: context.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Message safe to return to clients; internals stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::Internal { context } = &self {
            tracing::error!(context = %context, "Unhandled error while processing request");
        }

        let body = Json(json!({
            "detail": self.public_message(),
            "error": self.error_type(),
        }));

        (status, body).into_response()
    }
}
