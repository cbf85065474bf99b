// error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors reported by a cloud backend or one of its devices.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Cloud service unavailable: {0}")]
    Unavailable(String),
    #[error("Device {device} rejected command: {reason}")]
    Rejected { device: String, reason: String },
    #[error("Device {0} is offline")]
    Offline(String),
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Password is required")]
    MissingCredential,
    #[error("Device discovery failed: {0}")]
    DiscoveryFailed(#[source] CloudError),
    #[error("Device command failed: {0}")]
    DeviceCommandFailed(#[source] CloudError),
    #[error("No garage door found")]
    NoDeviceFound,
    #[error("Validation error: {0}")]
    Validation(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NoDeviceFound => StatusCode::NOT_FOUND,
            AppError::DiscoveryFailed(_) | AppError::DeviceCommandFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::DiscoveryFailed(_) | AppError::DeviceCommandFailed(_) => {
                tracing::error!("{self}")
            }
            _ => tracing::warn!(%status, "{self}"),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
