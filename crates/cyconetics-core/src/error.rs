//! Shared error type across cyconetics crates.
//!
//! These are faults, not policy outcomes: a policy outcome is a
//! `ValidationResult` carrying a `Violation`.

use thiserror::Error;

/// Stable error codes surfaced to callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed configuration.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Caller override could not be applied to a template.
    InvalidOverride,
    /// Internal engine fault.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::InvalidOverride => "INVALID_OVERRIDE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CyconeticsError>;

/// Unified error type used by core and router.
#[derive(Debug, Error)]
pub enum CyconeticsError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("invalid override for `{field}`: {reason}")]
    InvalidOverride { field: String, reason: String },
    #[error("unknown override field: {0}")]
    UnknownField(String),
    #[error("override may not change kind {from} into {to}")]
    KindChange { from: String, to: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl CyconeticsError {
    /// Map error to a stable code.
    pub fn client_code(&self) -> ErrorCode {
        match self {
            CyconeticsError::BadRequest(_) => ErrorCode::BadRequest,
            CyconeticsError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            CyconeticsError::InvalidOverride { .. }
            | CyconeticsError::UnknownField(_)
            | CyconeticsError::KindChange { .. } => ErrorCode::InvalidOverride,
            CyconeticsError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors produced while applying caller overrides.
    pub fn is_override_error(&self) -> bool {
        self.client_code() == ErrorCode::InvalidOverride
    }
}
