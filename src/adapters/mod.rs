//! Event and cloud-event adapters.
//!
//! # Data Flow
//! ```text
//! POST request body / headers
//!     → event.rs (legacy {data, context} payload)
//!     → cloud_event.rs (structured or binary CloudEvents)
//!     → user function
//!     → respond(): one response write for the function's outcome
//! ```
//!
//! # Design Decisions
//! - Payloads are deserialized with serde only; no schema validation
//! - Unreadable payloads are 400, function failures are 500
//! - Function failures are answered here and never reach the transport

pub mod cloud_event;
pub mod event;

use std::error::Error as StdError;

use axum::{
    body::Bytes,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;

use crate::error::InvocationError;
use crate::function::FunctionResult;

/// Response header flagging that the function reported an error.
pub const FUNCTION_STATUS_HEADER: &str = "x-function-status";

/// Read the whole request body.
///
/// Size limits come from the server's body limit layer; a streamed body that
/// trips it mid-read is reported as too large, not as malformed.
async fn read_body(request: Request) -> Result<Bytes, InvocationError> {
    axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| {
            if exceeded_length_limit(&e) {
                InvocationError::PayloadTooLarge
            } else {
                InvocationError::MalformedPayload(format!("failed to read body: {}", e))
            }
        })
}

/// Walk the error chain looking for the limit layer's error.
fn exceeded_length_limit(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if err.is::<LengthLimitError>() {
            return true;
        }
        current = err.source();
    }
    false
}

/// Turn an event function's outcome into the single response written for it.
fn respond(result: FunctionResult) -> Response {
    match result {
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(value)) => Json(value).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "Function returned an error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(FUNCTION_STATUS_HEADER, "error")],
                error.to_string(),
            )
                .into_response()
        }
    }
}
