use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;
use crate::validate::Validate;

/// A JSON request body that passed validation into `T`.
///
/// Rejects with `MissingBody` when there is no payload (or it is `null`),
/// `MalformedBody` when it is not JSON, `BodyRejected` when it cannot be
/// read at all (e.g. over the size limit), and `Validation` with the full
/// field list otherwise. Nothing reaches the database on rejection.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| {
                debug!(error = %err, "Failed to read request body");
                AppError::BodyRejected {
                    status: err.status(),
                    message: err.body_text(),
                }
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::MissingBody);
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|err| {
            debug!(error = %err, "Rejected malformed JSON body");
            AppError::MalformedBody
        })?;

        if body.is_null() {
            return Err(AppError::MissingBody);
        }

        match T::validate(&body) {
            Ok(value) => Ok(ValidJson(value)),
            Err(errors) => {
                debug!(?errors, "Rejected invalid body");
                Err(AppError::Validation(errors))
            }
        }
    }
}
