//! Error types for the invoice engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions raised by the stores, the directories and the
//! invoicing workflow. Pure calculators never fail.

use thiserror::Error;

/// The main error type for the invoice engine.
///
/// # Example
///
/// ```
/// use invoice_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "employee",
///     id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input to an operation.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// The operation collides with existing state (duplicate entry, frozen record,
    /// illegal status transition).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "employee", "contract").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// No billing rate could be determined for a contract.
    #[error("No billing rate for contract '{contract_id}'")]
    Resolution {
        /// The contract whose rate could not be resolved.
        contract_id: String,
    },

    /// The key-value store failed to read or write a key.
    #[error("Storage error on key '{key}': {message}")]
    Storage {
        /// The key being accessed.
        key: String,
        /// A description of the failure.
        message: String,
    },

    /// A stored blob could not be encoded or decoded.
    #[error("Serialization error on key '{key}': {message}")]
    Serialization {
        /// The key holding the blob.
        key: String,
        /// The serde error message.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns true for lookups that failed because the record is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
