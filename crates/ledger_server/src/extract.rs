//! Request body extraction with ledger-shaped rejections.

use axum::{
    async_trait,
    body::{self, Body},
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use ledger_core::error::{FieldError, FieldLocation};
use ledger_core::LedgerError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Upper bound on buffered request bodies; matches axum's default limit.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// JSON body extractor.
///
/// - no JSON content type, or an empty body: treated as an empty object,
///   so required fields are reported by validation
/// - well-formed JSON of the wrong shape: 400 field error
/// - unparseable body: fallback 500
pub struct JsonBody<T>(pub T);

fn empty_object<T: DeserializeOwned>() -> Result<JsonBody<T>, AppError> {
    serde_json::from_value(serde_json::Value::Object(Default::default()))
        .map(JsonBody)
        .map_err(|e| AppError::Unhandled(e.to_string()))
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, raw) = req.into_parts();
        let bytes = body::to_bytes(raw, BODY_LIMIT)
            .await
            .map_err(|e| AppError::Unhandled(e.to_string()))?;
        if bytes.is_empty() {
            return empty_object();
        }
        let req = Request::from_parts(parts, Body::from(bytes));

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => empty_object(),
            Err(JsonRejection::JsonDataError(e)) => {
                Err(AppError::Ledger(LedgerError::Validation(vec![FieldError {
                    value: None,
                    msg: e.body_text(),
                    param: "body".to_string(),
                    location: FieldLocation::Body,
                }])))
            }
            Err(other) => Err(AppError::Unhandled(other.body_text())),
        }
    }
}
