//! Node-expansion engine for Graphloom
//!
//! A single declared function, annotated with one expansion strategy,
//! becomes a collection of independent graph nodes: each with its own
//! name, output type, documentation, input bindings, and callable body.
//! This is how one reusable function turns into many distinct nodes
//! without duplicating code.
//!
//! Strategies:
//!
//! - [`Parameterize`]: rewrite the call signature per named output,
//!   binding some parameters to literal values and others to renamed
//!   upstream references
//! - [`ExtractColumns`] / [`ExtractFields`]: split a structured output
//!   (table or mapping) into one node per declared column/field plus a
//!   node for the container itself
//! - [`ParameterizeExtractColumns`]: parameterize across variants, then
//!   extract declared columns from each variant
//!
//! Everything here runs at graph-definition time, synchronously. The host
//! graph builder applies a strategy through [`apply`]: validate the
//! function's shape, build its initial node, expand, and replace the
//! function with the returned nodes. Configuration and validation errors
//! surface at that call site; only column/field extraction failures are
//! deferred to node invocation, since they depend on runtime data shape.

pub mod aliases;
pub mod combined;
pub mod dependencies;
pub mod docstring;
pub mod error;
pub mod extract;
pub mod parameterize;
pub mod strategy;

// Re-export key types
pub use aliases::{AliasEntry, AliasRegistry};
pub use combined::{ParameterizeExtractColumns, ParameterizedExtract};
pub use dependencies::{source, value, Dependency};
pub use error::{ConfigurationError, ValidationError};
pub use extract::{ColumnSpec, ExtractColumns, ExtractFields};
pub use parameterize::{OutputSpec, Parameterize};
pub use strategy::{apply, ExpandConfig, NodeExpander};

// Re-export the contract types consumers will need
pub use graphloom_node_contracts::{
    CallError, DataType, FunctionDef, JsonTableCapability, Node, NodeInputs, TableCapability,
};
