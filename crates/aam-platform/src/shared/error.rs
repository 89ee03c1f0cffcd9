//! Gateway Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::iam::federation_client::FederationError;
use crate::identity::sentinel_client::UpstreamError;

/// Body returned for a missing or malformed bearer token
pub const UNAUTHORIZED_MESSAGE: &str = "you are not authorized to access this resource";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Federation(#[from] FederationError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Upstream(e) => status_or_internal(e.status_code),
            GatewayError::Federation(e) => status_or_internal(e.status_code),
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `message` field of the response body
    pub fn message(&self) -> String {
        match self {
            GatewayError::Upstream(e) => e.message.clone(),
            GatewayError::Federation(e) => e.message.clone(),
            other => other.to_string(),
        }
    }
}

fn status_or_internal(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = ErrorResponse {
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}
