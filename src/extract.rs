// extract.rs
use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// JSON body of a door command.
///
/// Anything that does not carry a non-empty string `password` is rejected as
/// [`AppError::MissingCredential`], whatever the content type or shape. Other
/// malformed fields are [`AppError::Validation`].
pub struct CommandBody<T>(pub T);

impl<S, T> FromRequest<S> for CommandBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::MissingCredential)?;
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|_| AppError::MissingCredential)?;

        match value.get("password").and_then(Value::as_str) {
            Some(password) if !password.is_empty() => {}
            _ => return Err(AppError::MissingCredential),
        }

        let body: T =
            serde_json::from_value(value).map_err(|e| AppError::Validation(e.to_string()))?;
        body.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(Self(body))
    }
}
