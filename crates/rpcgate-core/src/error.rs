//! Shared error type across rpcGate crates.

use thiserror::Error;

/// Status codes surfaced to the transport (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// Call completed.
    Ok,
    /// Authorization denied (missing/invalid credentials or failed policy).
    Unauthenticated,
    /// Action not present on the service definition.
    Unimplemented,
    /// Invalid input / malformed request.
    InvalidArgument,
    /// Internal server error.
    Internal,
}

impl StatusCode {
    /// String representation used in logs and rendered responses.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Unauthenticated => "UNAUTHENTICATED",
            StatusCode::Unimplemented => "UNIMPLEMENTED",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RpcGateError>;

/// Unified error type used by core and the service layer.
#[derive(Debug, Error)]
pub enum RpcGateError {
    /// A configured permission predicate denied the call.
    #[error("authorization denied: {0}")]
    AuthDenied(String),
    /// The requested action is not bound on the service definition.
    #[error("method not implemented: {0}")]
    Unimplemented(String),
    /// Invalid bind-time or file configuration. Fatal, never per-call.
    #[error("configuration error: {0}")]
    Config(String),
    /// Failure propagated unchanged from a wrapped method handler.
    #[error("handler failed: {0}")]
    Handler(String),
    /// Malformed request input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl RpcGateError {
    /// Map the error to the stable status code shown to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RpcGateError::AuthDenied(_) => StatusCode::Unauthenticated,
            RpcGateError::Unimplemented(_) => StatusCode::Unimplemented,
            RpcGateError::BadRequest(_) => StatusCode::InvalidArgument,
            RpcGateError::Config(_) | RpcGateError::Handler(_) | RpcGateError::Internal(_) => {
                StatusCode::Internal
            }
        }
    }
}
