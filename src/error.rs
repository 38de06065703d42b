//! Error types for content graph construction.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.

use thiserror::Error;

/// Result type alias for content graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Comprehensive error type for all graph construction operations.
///
/// Errors are designed to fail fast, before any mutation begins, and to name
/// exactly which input was rejected. Cycle detection is deliberately *not* an
/// error: cycles are an expected property of content graphs and produce a
/// degraded-but-valid node instead (see [`crate::graph::flatten`]).
#[derive(Error, Debug)]
pub enum GraphError {
    /// A public entry point received a malformed or missing argument.
    #[error("Invalid argument '{parameter}': {message}")]
    InvalidArgument {
        /// Name of the offending parameter
        parameter: String,
        /// Description of what was wrong with it
        message: String,
    },

    /// A raw record failed boundary validation (missing `system.codename`,
    /// wrong shape, unparseable JSON structure).
    #[error("Malformed record: {message}")]
    MalformedRecord {
        /// Description of what was missing or malformed
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization error outside the digest fallback path.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GraphError {
    /// Create an invalid-argument error naming the offending parameter.
    pub fn invalid_argument(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-record error from a message and optional source.
    pub fn malformed_record<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::MalformedRecord {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}
