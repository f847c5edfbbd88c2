//! Invocation error types.
//!
//! Errors raised while running a normalized handler flow back to axum
//! unchanged; the conversion into a response is the transport's default
//! error path and is the only place they are logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tower::BoxError;

use crate::function::SignatureType;

/// Errors produced while invoking a user function.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The user function itself failed.
    #[error("function failed: {0}")]
    Function(#[source] BoxError),

    /// The request body could not be turned into function arguments.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The request body exceeded the configured size limit while streaming.
    #[error("payload exceeds the configured body limit")]
    PayloadTooLarge,

    /// The registered function does not follow the declared calling convention.
    #[error("function of kind '{provided}' cannot serve signature type '{declared}'")]
    SignatureMismatch {
        declared: SignatureType,
        provided: &'static str,
    },

    /// A callback-style function returned without ever completing its callback.
    #[error("completion callback dropped before it was called")]
    CallbackDropped,
}

impl InvocationError {
    /// HTTP status the transport answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvocationError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            InvocationError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InvocationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Function invocation failed");
        } else {
            tracing::warn!(error = %self, "Rejected invocation payload");
        }
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
