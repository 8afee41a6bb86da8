//! Error taxonomy for the request handlers and its HTTP mapping.

use axum::{
    Json,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when an error would otherwise reach the caller without one.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocurrió un error en el servidor.";

#[derive(Debug, Error)]
pub enum AppError {
    /// The route exists but does not accept this method.
    #[error("Method {method} Not Allowed")]
    MethodNotAllowed { method: Method, allow: Method },

    /// A required field is missing from the request.
    #[error("{0}")]
    Validation(String),

    /// The record store could not be read.
    #[error("{0}")]
    Fetch(String),

    /// The mail service did not accept the message.
    #[error("{0}")]
    Send(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// JSON body of every non-405 response that carries only a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl AppError {
    pub fn method_not_allowed(method: Method, allow: Method) -> Self {
        AppError::MethodNotAllowed { method, allow }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) | AppError::Send(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The caller-facing message; never empty.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::MethodNotAllowed { allow, .. } => (
                status,
                [(header::ALLOW, allow.as_str().to_string())],
                self.to_string(),
            )
                .into_response(),
            _ => (status, Json(MessageBody::new(self.message()))).into_response(),
        }
    }
}
