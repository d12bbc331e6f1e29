use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub msg: String,
    pub param: String,
    pub location: FieldLocation,
}

/// Where the offending input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLocation {
    Body,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error("{0} not found!")]
    NotFound(&'static str),

    #[error("{0}")]
    Store(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            // Malformed and unknown ids both answer 401; clients rely on it.
            Self::InvalidId(_) | Self::NotFound(_) => 401,
            Self::Store(_) => 500,
        }
    }
}
