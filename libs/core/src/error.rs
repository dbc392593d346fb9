use http::StatusCode;
use thiserror::Error;

/// Failure taxonomy for a single handler invocation.
///
/// Every variant is converted to a [`DispatchResult`](crate::DispatchResult)
/// at the invocation boundary; nothing propagates to the event router beyond
/// the (message, status) pair. The messages keep the markers the router-side
/// tooling greps for (`JSONDecodeError`, `KeyError`, `AttributeError`).
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The payload was not valid JSON.
    #[error("Invalid JSON > JSONDecodeError: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// A mandatory key was absent (or not the expected string type).
    #[error("Invalid JSON, required key not found > KeyError: '{0}'")]
    MissingField(String),

    /// An intermediate value on a nested path was not a JSON object.
    #[error("Invalid JSON, data not iterable > AttributeError: '{0}'")]
    NotIterable(String),

    /// Configuration file unreadable or missing a mandatory key.
    #[error("{0}")]
    Config(String),

    /// The external service could not be reached.
    #[error("{0}")]
    Connection(String),

    /// One of the configured custom-attribute names is not defined in the
    /// inventory service's field catalog.
    #[error("Missing attribute for owner or creation_date")]
    MissingAttributeDefinition,

    /// No inventory object matched the event's VM reference.
    #[error("Missing virtual machine to apply custom attributes")]
    VmNotFound,

    /// The external service answered with a non-2xx status.
    #[error("Invalid status code returned: {status}")]
    UpstreamHttp { status: StatusCode },
}

impl HandlerError {
    /// Status reported to the event router for this failure.
    ///
    /// Malformed input maps to 500 and upstream statuses pass through
    /// un-normalized, matching the observed behavior of the original
    /// handlers.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::VmNotFound => StatusCode::NOT_FOUND,
            HandlerError::UpstreamHttp { status } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
