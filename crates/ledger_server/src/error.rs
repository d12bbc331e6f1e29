//! Mapping of ledger failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_core::LedgerError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Ledger(LedgerError),
    /// Anything without a dedicated response shape: `500 {"error": …}`.
    Unhandled(String),
}

impl AppError {
    /// Id-taking endpoints report store failures through the process-wide
    /// fallback shape rather than as plain text.
    pub fn unhandled_store(err: LedgerError) -> Self {
        match err {
            LedgerError::Store(e) => Self::Unhandled(e.to_string()),
            other => Self::Ledger(other),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Ledger(err) => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                match err {
                    LedgerError::Validation(errors) => (
                        status,
                        Json(json!({ "success": false, "errors": errors })),
                    )
                        .into_response(),
                    LedgerError::InvalidId(raw) => {
                        tracing::debug!(id = %raw, "rejected malformed id");
                        (status, Json(json!({ "error": "Invalid Request" }))).into_response()
                    }
                    LedgerError::NotFound(label) => (
                        status,
                        Json(json!({ "error": format!("{label} not found!") })),
                    )
                        .into_response(),
                    LedgerError::Store(e) => {
                        tracing::error!("store failure: {e:#}");
                        (status, e.to_string()).into_response()
                    }
                }
            }
            Self::Unhandled(message) => {
                tracing::error!("unhandled error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}
