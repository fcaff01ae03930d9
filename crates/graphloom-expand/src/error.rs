//! Error types for the expansion engine
//!
//! Two deterministic failure classes, both raised synchronously at the
//! call site that applies a strategy: configuration errors at strategy
//! construction, validation errors during `validate`. Extraction failures
//! at node-invocation time are `CallError`s in the contracts crate.

use graphloom_node_contracts::DataType;
use thiserror::Error;

/// Malformed strategy construction arguments
///
/// Raised before any function is inspected.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A strategy was constructed with no outputs/columns/fields
    #[error("Empty declaration passed to {strategy}")]
    EmptyDeclaration { strategy: &'static str },

    /// An output declared an empty dependency mapping where one is required
    #[error("Output '{output}' has an empty dependency mapping")]
    EmptyMapping { output: String },

    /// The same output name was declared more than once
    #[error("Duplicate output name '{output}' across extract records")]
    DuplicateOutput { output: String },
}

/// A function's shape does not satisfy a strategy's requirements
///
/// Raised during `validate`, before expansion, so the graph never
/// contains partially-expanded nodes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Declared target parameters are absent from the function signature
    #[error("Parameterization of '{function}' is invalid: the following parameters don't appear in the function itself: {missing:?}")]
    MissingParameters {
        function: String,
        missing: Vec<String>,
    },

    /// The function declares the reserved placeholder keyword as a parameter
    #[error("Function '{function}' cannot have '{reserved}' as a parameter, it is reserved")]
    ReservedParameter {
        function: String,
        reserved: &'static str,
    },

    /// An output node name collides with the reserved placeholder keyword
    #[error("Output name '{output}' collides with the reserved placeholder keyword")]
    ReservedOutputName { output: String },

    /// The return type is not a recognized structured-table type
    #[error("Function '{function}' returns {actual:?}, which is not a table type the capability provider knows about")]
    UnsupportedReturnType { function: String, actual: DataType },

    /// The return type is not a mapping
    #[error("For extracting fields, function '{function}' must return a mapping, not {actual:?}")]
    NotAMapping { function: String, actual: DataType },
}
