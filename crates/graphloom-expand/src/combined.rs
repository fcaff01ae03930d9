//! Combined parameterize-and-extract strategy
//!
//! Gives a function the power of both `Parameterize` and
//! `ExtractColumns` at once: the function is parameterized across several
//! variants, and the declared output columns are extracted from each
//! variant's table. Rather than reimplementing either half, each record
//! stages an intermediate node, parameterizes it, and extracts from the
//! result.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use graphloom_node_contracts::{CallError, FunctionDef, Node, NodeFn, NodeInputs, TableCapability};

use crate::dependencies::Dependency;
use crate::error::{ConfigurationError, ValidationError};
use crate::extract::{ColumnSpec, ExtractColumns};
use crate::parameterize::{expand_output, OutputSpec};
use crate::strategy::{ExpandConfig, NodeExpander};

/// One record of a combined expansion: an output-column tuple paired with
/// a full parameterization
#[derive(Debug, Clone)]
pub struct ParameterizedExtract {
    outputs: Vec<String>,
    bindings: IndexMap<String, Dependency>,
}

impl ParameterizedExtract {
    /// Create a record from output column names and parameter bindings
    pub fn new(
        outputs: impl IntoIterator<Item = impl Into<String>>,
        bindings: impl IntoIterator<Item = (impl Into<String>, Dependency)>,
    ) -> Self {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            bindings: bindings
                .into_iter()
                .map(|(param, dep)| (param.into(), dep))
                .collect(),
        }
    }
}

/// Expansion strategy composing parameterization with column extraction
///
/// For each record, an intermediate node under a synthesized name
/// (`{base}__{index}`) wraps the function and, unless disabled via
/// [`keep_columns`](Self::keep_columns), overwrites the produced table's
/// column labels with the record's output tuple in order. That node is
/// parameterized with the record's bindings, then split per output
/// column. Output names are produced node names, so they must be unique
/// across all records.
pub struct ParameterizeExtractColumns {
    capability: Arc<dyn TableCapability>,
    records: Vec<ParameterizedExtract>,
    reassign_columns: bool,
}

impl ParameterizeExtractColumns {
    /// Create a combined expansion over the given capability provider
    ///
    /// Errors on an empty record list, a record with no outputs, or an
    /// output name declared by more than one record.
    pub fn new(
        capability: Arc<dyn TableCapability>,
        records: impl IntoIterator<Item = ParameterizedExtract>,
    ) -> Result<Self, ConfigurationError> {
        let records: Vec<ParameterizedExtract> = records.into_iter().collect();
        if records.is_empty() {
            return Err(ConfigurationError::EmptyDeclaration {
                strategy: "parameterize extract columns",
            });
        }
        let mut seen: Vec<&str> = Vec::new();
        for record in &records {
            if record.outputs.is_empty() {
                return Err(ConfigurationError::EmptyDeclaration {
                    strategy: "parameterize extract columns",
                });
            }
            for output in &record.outputs {
                if seen.contains(&output.as_str()) {
                    return Err(ConfigurationError::DuplicateOutput {
                        output: output.clone(),
                    });
                }
                seen.push(output);
            }
        }
        Ok(Self {
            capability,
            records,
            reassign_columns: true,
        })
    }

    /// Keep the table's own column labels instead of reassigning them
    pub fn keep_columns(mut self) -> Self {
        self.reassign_columns = false;
        self
    }
}

impl fmt::Debug for ParameterizeExtractColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterizeExtractColumns")
            .field("records", &self.records)
            .field("reassign_columns", &self.reassign_columns)
            .finish_non_exhaustive()
    }
}

impl NodeExpander for ParameterizeExtractColumns {
    fn validate(&self, function: &FunctionDef) -> Result<(), ValidationError> {
        ExtractColumns::validate_return_type(self.capability.as_ref(), function)
    }

    fn expand(
        &self,
        node: &Node,
        config: &ExpandConfig,
        function: &FunctionDef,
    ) -> Result<Vec<Node>, ValidationError> {
        let mut nodes = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            // Synthesized name keeps intermediate nodes from colliding
            // across records.
            let staged_name = format!("{}__{}", node.name, index);

            let intermediate = if self.reassign_columns {
                let base = node.callable().clone();
                let capability = self.capability.clone();
                let labels = record.outputs.clone();
                let producer = staged_name.clone();
                let relabeled: Arc<NodeFn> = Arc::new(move |inputs: &NodeInputs| {
                    let mut table = base(inputs)?;
                    let actual = capability.column_names(&table).len();
                    if actual != labels.len() {
                        return Err(CallError::ColumnCountMismatch {
                            node: producer.clone(),
                            expected: labels.len(),
                            actual,
                        });
                    }
                    capability.reassign_columns(&mut table, &labels);
                    Ok(table)
                });
                node.copy_with(relabeled)
            } else {
                node.clone()
            };

            let parameterized = expand_output(
                &intermediate,
                function,
                &staged_name,
                &OutputSpec::new(record.bindings.clone()),
            );

            let extract = ExtractColumns::from_parts(
                self.capability.clone(),
                record
                    .outputs
                    .iter()
                    .map(|name| ColumnSpec::from(name.clone()))
                    .collect(),
                None,
            );
            nodes.extend(extract.expand(&parameterized, config, function)?);
        }
        Ok(nodes)
    }
}
