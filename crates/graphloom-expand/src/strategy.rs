//! Expansion strategy contract
//!
//! A strategy is attached to exactly one function. The host graph builder
//! calls `validate` once, builds the function's initial unexpanded node,
//! then calls `expand` and replaces the function with the returned nodes.

use std::collections::HashMap;

use graphloom_node_contracts::{FunctionDef, Node};

use crate::error::ValidationError;

/// Opaque per-graph configuration passed through to strategies
///
/// Reserved for future use; every built-in strategy currently ignores it.
pub type ExpandConfig = HashMap<String, serde_json::Value>;

/// A rule that turns one declared function into one or more nodes
pub trait NodeExpander {
    /// Check the function's shape against this strategy's requirements
    ///
    /// Runs before any node is built, so a failure never leaves the graph
    /// partially expanded.
    fn validate(&self, function: &FunctionDef) -> Result<(), ValidationError>;

    /// Expand the function's initial node into the final node collection
    ///
    /// `node` is the yet-unexpanded node built from the raw function.
    /// Callers must run `validate` first; `expand` only fails when that
    /// contract is skipped.
    fn expand(
        &self,
        node: &Node,
        config: &ExpandConfig,
        function: &FunctionDef,
    ) -> Result<Vec<Node>, ValidationError>;
}

/// Apply a strategy to a function per the host application contract
///
/// Validates, builds the initial node, and expands. The returned nodes
/// replace the single function in the graph.
pub fn apply(
    strategy: &impl NodeExpander,
    function: &FunctionDef,
    config: &ExpandConfig,
) -> Result<Vec<Node>, ValidationError> {
    strategy.validate(function)?;
    let node = function.to_node();
    let nodes = strategy.expand(&node, config, function)?;
    log::debug!(
        "expanded function '{}' into {} node(s)",
        function.name(),
        nodes.len()
    );
    Ok(nodes)
}
