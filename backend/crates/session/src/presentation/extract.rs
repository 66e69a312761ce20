//! Request Extractors

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::SessionError;

/// JSON body extractor that reports every malformed payload as 400
///
/// The stock `Json` extractor answers deserialization failures with
/// 422 and content-type mismatches with 415; this service treats all of
/// them as one malformed-request class.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| SessionError::MalformedRequest(rejection.body_text()))?;
        Ok(Payload(value))
    }
}
