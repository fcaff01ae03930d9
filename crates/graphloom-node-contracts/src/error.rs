//! Invocation-time errors for node callables

use thiserror::Error;

/// Result type alias for node callable invocation
pub type CallResult<T> = std::result::Result<T, CallError>;

/// Errors raised when a produced node callable is invoked
///
/// These are the only failures deferred to execution time; everything
/// else in the expansion engine fails at construction or validation.
#[derive(Debug, Error)]
pub enum CallError {
    /// A required input was not supplied
    #[error("Missing required input '{input}' for node '{node}'")]
    MissingInput { node: String, input: String },

    /// A declared column was absent from the produced table
    #[error("No such column '{column}' produced by '{producer}'. It only produced {available:?}")]
    ColumnNotFound {
        column: String,
        producer: String,
        available: Vec<String>,
    },

    /// A declared field was absent from the produced mapping
    #[error("No such field '{field}' produced by '{producer}'. It only produced {available:?}")]
    FieldNotFound {
        field: String,
        producer: String,
        available: Vec<String>,
    },

    /// The produced value did not have the declared structural shape
    #[error("Node '{node}' produced a value that is not a {expected}")]
    UnexpectedShape {
        node: String,
        expected: &'static str,
    },

    /// The produced table's column count did not match the declared labels
    #[error("Node '{node}' produced {actual} column(s) but {expected} output name(s) were declared")]
    ColumnCountMismatch {
        node: String,
        expected: usize,
        actual: usize,
    },

    /// Node body execution failed
    #[error("Execution failed: {0}")]
    Failed(String),
}

impl CallError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
