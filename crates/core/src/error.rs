//! Error types for the preference store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! ## Taxonomy
//!
//! - [`Error::InvalidArgument`]: contract violations at a call boundary,
//!   surfaced synchronously before any I/O
//! - [`EncodeError`] / [`DecodeError`]: serializer boundary failures,
//!   always classified and carrying the original cause
//! - [`StorageError`]: backend failures; never suppressed by the query
//!   layer
//! - [`Error::MissingSerializer`]: structured-value operation against a
//!   store configured without a serializer; fails fast, not retried

use crate::kind::PrimitiveKind;
use thiserror::Error;

/// Result type alias for prefstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error cause, used to preserve the original failure
type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Error types for the preference store
#[derive(Debug, Error)]
pub enum Error {
    /// Contract violation detected at call time (empty key, missing
    /// builder input). Never deferred to execution.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Serializer boundary failure while encoding
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Serializer boundary failure while decoding, or a typed read
    /// against a key holding a different primitive kind
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Backend storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Structured-value operation on a store built without a serializer
    #[error("no serializer configured for structured values")]
    MissingSerializer,
}

impl Error {
    /// Shorthand for an [`Error::InvalidArgument`]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

/// Failure while encoding a structured value to its string form
#[derive(Debug, Error)]
#[error("encoding failed: {source}")]
pub struct EncodeError {
    #[source]
    source: Cause,
}

impl EncodeError {
    /// Wrap the underlying serializer failure
    pub fn new(source: impl Into<Cause>) -> Self {
        EncodeError {
            source: source.into(),
        }
    }
}

/// Failure while decoding a stored string back into a value
///
/// Distinguishes bad stored data (`Malformed`) from a typed read whose
/// expected kind disagrees with what the store actually holds
/// (`TypeMismatch`). Both count as resolution failures for the value
/// query error policy.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Stored payload could not be decoded into the requested type
    #[error("malformed encoded value: {source}")]
    Malformed {
        #[source]
        source: Cause,
    },

    /// Stored primitive has a different kind than the read requested
    #[error("type mismatch: expected {expected}, stored {actual}")]
    TypeMismatch {
        /// Kind the caller asked for
        expected: PrimitiveKind,
        /// Kind actually stored under the key
        actual: PrimitiveKind,
    },
}

impl DecodeError {
    /// Wrap the underlying serializer failure
    pub fn malformed(source: impl Into<Cause>) -> Self {
        DecodeError::Malformed {
            source: source.into(),
        }
    }
}

/// Failure at the primitive store boundary (I/O, backend fault)
#[derive(Debug, Error)]
#[error("storage error: {message}")]
pub struct StorageError {
    message: String,
    #[source]
    source: Option<Cause>,
}

impl StorageError {
    /// Storage failure without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        StorageError {
            message: message.into(),
            source: None,
        }
    }

    /// Storage failure wrapping the backend's own error
    pub fn with_source(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        StorageError {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
