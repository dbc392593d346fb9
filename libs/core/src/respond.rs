use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::error::HandlerError;

/// Outcome of one handler invocation: the (message, status) pair handed back
/// to the event router. Diagnostic detail stays in the logs; only the short
/// message leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub message: String,
    pub status: StatusCode,
}

impl DispatchResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::OK,
        }
    }
}

impl From<HandlerError> for DispatchResult {
    fn from(err: HandlerError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
        }
    }
}

impl IntoResponse for DispatchResult {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
