//! Shared primitives for all Rust crates in the governance provider.

#![forbid(unsafe_code)]

/// Three-valued attribute wrapper.
pub mod attr;
/// Conversions between host values and native typed values.
pub mod bridge;
/// Request-scoped context threaded into every remote call.
pub mod context;
/// Diagnostics reported back to the host runtime.
pub mod diagnostics;
/// Dynamically typed host-runtime values.
pub mod host_value;
/// Schema descriptions published to the host runtime.
pub mod schema;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use attr::Attr;
pub use bridge::{HostType, ObjectReader, ObjectWriter, SetOf};
pub use context::RequestContext;
pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use host_value::HostValue;
pub use schema::{AttributeType, NestedBlock, NestingMode, Requirement, Schema, SchemaAttribute};

/// Result type used across provider crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested remote object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing remote state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials are missing or were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials are valid but lack the required scope.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested change cannot be applied in place.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Non-success response from the governance service.
    #[error("remote error (status {status}): {message}")]
    Remote {
        /// HTTP status code returned by the service.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A response could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The host runtime cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true when the remote object is reported as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Remote { status: 404, .. })
    }
}
