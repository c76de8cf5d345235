use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use finapi_core::LedgerError;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The request body or query string could not be extracted.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::DuplicateAccount) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(LedgerError::InvalidTaxId) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(LedgerError::AccountNotFound) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::InsufficientFunds) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.to_string())
    }
}

/// `{"error": <message>}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}
