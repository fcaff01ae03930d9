//! Node, function, and capability contracts for Graphloom
//!
//! This crate defines the boundary types shared between the expansion
//! engine and the surrounding graph-building system:
//!
//! - `Node`: a named unit of the computational graph with a declared
//!   output type, callable body, and input dependencies
//! - `FunctionDef`: an explicit signature-description value for a
//!   declared function, queried by expansion strategies instead of
//!   runtime reflection
//! - `TableCapability`: the narrow interface through which structured
//!   (table-shaped) outputs are inspected and manipulated
//!
//! The expansion engine consumes and produces these values; it does not
//! define their execution semantics. Scheduling, caching, and parallelism
//! belong to the graph executor, not here.

pub mod capability;
pub mod error;
pub mod node;
pub mod types;

// Re-export key types
pub use capability::{JsonTableCapability, TableCapability, UnsupportedTypeError};
pub use error::{CallError, CallResult};
pub use node::{FunctionDef, Node, NodeFn, NodeInputs};
pub use types::{DataType, OutputShape};
