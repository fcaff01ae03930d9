//! Parameterize strategy
//!
//! Expands a single function into n nodes, each of which corresponds to
//! the function with some parameters replaced either by a specified
//! literal value (`value(..)`) or by the output of an upstream node
//! (`source(..)`).
//!
//! The convenience constructors [`Parameterize::values`] and
//! [`Parameterize::sources`] cover the common all-literal and
//! all-reference cases; both rewrite their arguments into full output
//! specifications and delegate here.
//!
//! # Example
//!
//! ```ignore
//! let strategy = Parameterize::new()
//!     .output("d_election_2016_shifted", [("one_off_date", source("d_election_2016"))])
//!     .output("other_output", [("one_off_date", source("some_input"))]);
//! let nodes = apply(&strategy, &date_shifter, &ExpandConfig::new())?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use graphloom_node_contracts::{CallError, FunctionDef, Node, NodeFn, NodeInputs};

use crate::dependencies::{source, value, Dependency};
use crate::docstring::{format_docstring, RESERVED_KWARG};
use crate::error::{ConfigurationError, ValidationError};
use crate::strategy::{ExpandConfig, NodeExpander};

/// One declared output of a parameterization
///
/// Maps target parameter names to their substitutions, with an optional
/// explicit documentation override for the produced node.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    bindings: IndexMap<String, Dependency>,
    documentation: Option<String>,
}

impl OutputSpec {
    /// Create an output specification from parameter bindings
    pub fn new(
        bindings: impl IntoIterator<Item = (impl Into<String>, Dependency)>,
    ) -> Self {
        Self {
            bindings: bindings
                .into_iter()
                .map(|(param, dep)| (param.into(), dep))
                .collect(),
            documentation: None,
        }
    }

    /// Override the produced node's documentation, bypassing templating
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// The parameter bindings of this output
    pub fn bindings(&self) -> &IndexMap<String, Dependency> {
        &self.bindings
    }
}

/// Expansion strategy that rewrites a function's call signature per output
///
/// Produces one node per declared output name. Literal-bound parameters
/// are injected at call time and dropped from the node's input types;
/// reference-bound parameters are required under the referenced upstream
/// name and renamed back before dispatch. Untouched parameters pass
/// through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Parameterize {
    outputs: IndexMap<String, OutputSpec>,
}

impl Parameterize {
    /// Create an empty parameterization
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an output with its parameter bindings
    ///
    /// An empty binding set is valid and duplicates the function verbatim
    /// under the new name.
    pub fn output(
        mut self,
        name: impl Into<String>,
        bindings: impl IntoIterator<Item = (impl Into<String>, Dependency)>,
    ) -> Self {
        self.outputs.insert(name.into(), OutputSpec::new(bindings));
        self
    }

    /// Declare an output with bindings and an explicit documentation string
    pub fn output_with_doc(
        mut self,
        name: impl Into<String>,
        doc: impl Into<String>,
        bindings: impl IntoIterator<Item = (impl Into<String>, Dependency)>,
    ) -> Self {
        self.outputs
            .insert(name.into(), OutputSpec::new(bindings).with_doc(doc));
        self
    }

    /// All-literal convenience form
    ///
    /// Each `((output, doc), literal)` row becomes an output binding the
    /// single `parameter` to that literal value.
    pub fn values<O, D>(
        parameter: impl Into<String>,
        assigned: impl IntoIterator<Item = ((O, D), Value)>,
    ) -> Result<Self, ConfigurationError>
    where
        O: Into<String>,
        D: Into<String>,
    {
        let parameter = parameter.into();
        let mut strategy = Parameterize::new();
        for ((output, doc), literal) in assigned {
            strategy = strategy.output_with_doc(
                output,
                doc,
                [(parameter.clone(), value(literal))],
            );
        }
        if strategy.outputs.is_empty() {
            return Err(ConfigurationError::EmptyDeclaration {
                strategy: "parameterize values",
            });
        }
        Ok(strategy)
    }

    /// All-reference convenience form
    ///
    /// Each output maps parameters to upstream node names.
    pub fn sources<O, M, P, U>(
        outputs: impl IntoIterator<Item = (O, M)>,
    ) -> Result<Self, ConfigurationError>
    where
        O: Into<String>,
        M: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        let mut strategy = Parameterize::new();
        for (output, mapping) in outputs {
            let output = output.into();
            let bindings: Vec<(String, Dependency)> = mapping
                .into_iter()
                .map(|(param, upstream)| (param.into(), source(upstream.into())))
                .collect();
            if bindings.is_empty() {
                return Err(ConfigurationError::EmptyMapping { output });
            }
            strategy = strategy.output(output, bindings);
        }
        if strategy.outputs.is_empty() {
            return Err(ConfigurationError::EmptyDeclaration {
                strategy: "parameterize sources",
            });
        }
        Ok(strategy)
    }

    /// Declared outputs in declaration order
    pub fn outputs(&self) -> &IndexMap<String, OutputSpec> {
        &self.outputs
    }
}

impl NodeExpander for Parameterize {
    fn validate(&self, function: &FunctionDef) -> Result<(), ValidationError> {
        // Once the reserved keyword cannot collide with a declared
        // parameter, docstring templating is total for every output.
        if function.has_param(RESERVED_KWARG) {
            return Err(ValidationError::ReservedParameter {
                function: function.name().to_string(),
                reserved: RESERVED_KWARG,
            });
        }
        let mut missing: Vec<String> = Vec::new();
        for (output, spec) in &self.outputs {
            if output == RESERVED_KWARG {
                return Err(ValidationError::ReservedOutputName {
                    output: output.clone(),
                });
            }
            for param in spec.bindings.keys() {
                if !function.has_param(param) && !missing.contains(param) {
                    missing.push(param.clone());
                }
            }
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingParameters {
                function: function.name().to_string(),
                missing,
            });
        }
        Ok(())
    }

    fn expand(
        &self,
        node: &Node,
        _config: &ExpandConfig,
        function: &FunctionDef,
    ) -> Result<Vec<Node>, ValidationError> {
        Ok(self
            .outputs
            .iter()
            .map(|(output_name, spec)| expand_output(node, function, output_name, spec))
            .collect())
    }
}

/// Build the node for a single declared output
///
/// Each produced callable carries its own rename and literal tables as
/// constructor-bound state.
pub(crate) fn expand_output(
    node: &Node,
    function: &FunctionDef,
    output_name: &str,
    spec: &OutputSpec,
) -> Node {
    let mut literals: Vec<(String, Value)> = Vec::new();
    let mut renames: Vec<(String, String)> = Vec::new();
    for (param, dep) in &spec.bindings {
        match dep {
            Dependency::Literal(v) => literals.push((param.clone(), v.clone())),
            Dependency::Reference(upstream) => {
                renames.push((param.clone(), upstream.clone()))
            }
        }
    }

    let documentation = format_docstring(
        function.documentation(),
        spec.documentation.as_deref(),
        output_name,
        &spec.bindings,
    );

    // Reference-bound parameters are required under the upstream name,
    // literal-bound parameters are bound rather than supplied, untouched
    // parameters pass through.
    let mut input_types = HashMap::with_capacity(node.input_types.len());
    for (param, data_type) in &node.input_types {
        if let Some((_, upstream)) = renames.iter().find(|(p, _)| p == param) {
            input_types.insert(upstream.clone(), *data_type);
        } else if !literals.iter().any(|(p, _)| p == param) {
            input_types.insert(param.clone(), *data_type);
        }
    }

    let base = node.callable().clone();
    let produced_name = output_name.to_string();
    let callable: Arc<NodeFn> = Arc::new(move |inputs: &NodeInputs| {
        // Stage referenced values before removing any key, so two
        // parameters may reference the same upstream node.
        let mut staged = Vec::with_capacity(renames.len());
        for (param, upstream) in &renames {
            let value = inputs
                .get(upstream)
                .cloned()
                .ok_or_else(|| CallError::MissingInput {
                    node: produced_name.clone(),
                    input: upstream.clone(),
                })?;
            staged.push((param.clone(), value));
        }
        let mut call_args = inputs.clone();
        for (_, upstream) in &renames {
            call_args.remove(upstream);
        }
        for (param, value) in staged {
            call_args.insert(param, value);
        }
        for (param, value) in &literals {
            call_args.insert(param.clone(), value.clone());
        }
        base(&call_args)
    });

    Node::new(
        output_name,
        node.data_type,
        documentation,
        callable,
        input_types,
        node.tags.clone(),
    )
}
