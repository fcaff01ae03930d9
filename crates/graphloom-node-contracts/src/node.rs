//! Node and function definition contracts
//!
//! A `Node` is a named unit of the computational graph: a declared output
//! type, a callable body, documentation, and a mapping of parameter name
//! to required input type. Nodes are created once by an expansion strategy
//! and are immutable thereafter; the graph builder consumes them.
//!
//! A `FunctionDef` is the signature-description value for a declared
//! function. Strategies query it for parameter names and annotations at
//! validation time instead of reflecting over a callable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{CallError, CallResult};
use crate::types::DataType;

/// Keyword inputs supplied to a node callable at invocation time
pub type NodeInputs = HashMap<String, Value>;

/// The callable body of a node
///
/// Pure function of its keyword inputs plus closed-over immutable
/// configuration, so concurrent invocation needs no synchronization.
pub type NodeFn = dyn Fn(&NodeInputs) -> CallResult<Value> + Send + Sync;

/// A named unit of the computational graph
#[derive(Clone)]
pub struct Node {
    /// Unique name within a graph
    pub name: String,
    /// Declared output type
    pub data_type: DataType,
    /// Documentation string, if any
    pub documentation: Option<String>,
    /// Parameter name -> required input type
    pub input_types: HashMap<String, DataType>,
    /// Free-form tags copied from the originating node
    pub tags: HashMap<String, String>,
    callable: Arc<NodeFn>,
}

impl Node {
    /// Create a new node
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        documentation: Option<String>,
        callable: Arc<NodeFn>,
        input_types: HashMap<String, DataType>,
        tags: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            documentation,
            input_types,
            tags,
            callable,
        }
    }

    /// The callable body of this node
    pub fn callable(&self) -> &Arc<NodeFn> {
        &self.callable
    }

    /// Invoke this node's callable with keyword inputs
    pub fn invoke(&self, inputs: &NodeInputs) -> CallResult<Value> {
        (self.callable)(inputs)
    }

    /// Copy this node, replacing only the callable
    pub fn copy_with(&self, callable: Arc<NodeFn>) -> Self {
        Self {
            name: self.name.clone(),
            data_type: self.data_type,
            documentation: self.documentation.clone(),
            input_types: self.input_types.clone(),
            tags: self.tags.clone(),
            callable,
        }
    }

    /// Fetch a required input by name, erroring if absent
    pub fn require_input<'a>(&self, inputs: &'a NodeInputs, name: &str) -> CallResult<&'a Value> {
        inputs.get(name).ok_or_else(|| CallError::MissingInput {
            node: self.name.clone(),
            input: name.to_string(),
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("documentation", &self.documentation)
            .field("input_types", &self.input_types)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Signature description and body of a declared function
///
/// This is what an expansion strategy is attached to. Parameters are kept
/// in declaration order.
///
/// # Example
///
/// ```ignore
/// let f = FunctionDef::new("concat", DataType::String, |inputs| {
///     // ...
/// })
/// .param("left", DataType::String)
/// .param("right", DataType::String)
/// .with_doc("Adding {right} to {left} to create {output_name}.");
/// ```
#[derive(Clone)]
pub struct FunctionDef {
    name: String,
    return_type: DataType,
    documentation: Option<String>,
    params: Vec<(String, DataType)>,
    tags: HashMap<String, String>,
    body: Arc<NodeFn>,
}

impl FunctionDef {
    /// Create a new function definition with a name, return type, and body
    pub fn new(
        name: impl Into<String>,
        return_type: DataType,
        body: impl Fn(&NodeInputs) -> CallResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            documentation: None,
            params: Vec::new(),
            tags: HashMap::new(),
            body: Arc::new(body),
        }
    }

    /// Declare a parameter with its annotated type
    pub fn param(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.params.push((name.into(), data_type));
        self
    }

    /// Attach a documentation string
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Attach a free-form tag
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared return type
    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    /// Documentation string, if any
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Declared parameters in declaration order
    pub fn params(&self) -> &[(String, DataType)] {
        &self.params
    }

    /// Whether a parameter with this name is declared
    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(p, _)| p == name)
    }

    /// The annotated type of a declared parameter
    pub fn param_type(&self, name: &str) -> Option<DataType> {
        self.params
            .iter()
            .find(|(p, _)| p == name)
            .map(|(_, t)| *t)
    }

    /// Build the initial, unexpanded node for this function
    ///
    /// The host graph builder calls this after a strategy's `validate`
    /// passes, then hands the node to `expand`.
    pub fn to_node(&self) -> Node {
        Node::new(
            self.name.clone(),
            self.return_type,
            self.documentation.clone(),
            self.body.clone(),
            self.params.iter().cloned().collect(),
            self.tags.clone(),
        )
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_fn() -> FunctionDef {
        FunctionDef::new("add", DataType::Number, |inputs| {
            let a = inputs["a"].as_f64().unwrap_or(0.0);
            let b = inputs["b"].as_f64().unwrap_or(0.0);
            Ok(json!(a + b))
        })
        .param("a", DataType::Number)
        .param("b", DataType::Number)
        .with_doc("Adds {a} and {b}.")
    }

    #[test]
    fn test_function_signature_queries() {
        let f = add_fn();
        assert!(f.has_param("a"));
        assert!(!f.has_param("c"));
        assert_eq!(f.param_type("b"), Some(DataType::Number));
        assert_eq!(f.params().len(), 2);
    }

    #[test]
    fn test_to_node_carries_signature() {
        let node = add_fn().to_node();
        assert_eq!(node.name, "add");
        assert_eq!(node.data_type, DataType::Number);
        assert_eq!(node.input_types.len(), 2);
        assert_eq!(node.input_types["a"], DataType::Number);
        assert_eq!(node.documentation.as_deref(), Some("Adds {a} and {b}."));
    }

    #[test]
    fn test_invoke() {
        let node = add_fn().to_node();
        let mut inputs = NodeInputs::new();
        inputs.insert("a".to_string(), json!(2.0));
        inputs.insert("b".to_string(), json!(3.0));
        assert_eq!(node.invoke(&inputs).unwrap(), json!(5.0));
    }

    #[test]
    fn test_copy_with_replaces_only_callable() {
        let node = add_fn().to_node();
        let replaced = node.copy_with(Arc::new(|_| Ok(json!(42))));
        assert_eq!(replaced.name, node.name);
        assert_eq!(replaced.input_types, node.input_types);
        assert_eq!(replaced.invoke(&NodeInputs::new()).unwrap(), json!(42));
    }

    #[test]
    fn test_require_input_missing() {
        let node = add_fn().to_node();
        let err = node.require_input(&NodeInputs::new(), "a").unwrap_err();
        assert!(matches!(err, CallError::MissingInput { .. }));
    }
}
