//! Column and field extraction strategies
//!
//! Both follow the same two-tier pattern: one node that produces the
//! original structured container (wrapping the base callable with an
//! optional default-fill pass), plus one node per declared column/field
//! whose callable takes the container under the producing node's name and
//! looks the entry up. Absence with no fill configured is a call-time
//! error carrying the names that were actually present.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use graphloom_node_contracts::{
    CallError, DataType, FunctionDef, Node, NodeFn, NodeInputs, OutputShape, TableCapability,
};

use crate::error::{ConfigurationError, ValidationError};
use crate::strategy::{ExpandConfig, NodeExpander};

/// A declared column: a bare name, or a name with a documentation override
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    name: String,
    documentation: Option<String>,
}

impl ColumnSpec {
    /// The column name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for ColumnSpec {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            documentation: None,
        }
    }
}

impl From<String> for ColumnSpec {
    fn from(name: String) -> Self {
        Self {
            name,
            documentation: None,
        }
    }
}

impl From<(&str, &str)> for ColumnSpec {
    fn from((name, doc): (&str, &str)) -> Self {
        Self {
            name: name.to_string(),
            documentation: Some(doc.to_string()),
        }
    }
}

/// Expansion strategy that splits a table-producing function per column
///
/// Produces one node under the base function's name for the table itself
/// and one node per declared column. With `fill_with` configured, columns
/// absent from the produced table are materialized with that value;
/// without it, absence is a call-time extraction error.
pub struct ExtractColumns {
    capability: Arc<dyn TableCapability>,
    columns: Vec<ColumnSpec>,
    fill_with: Option<Value>,
}

impl ExtractColumns {
    /// Create a column extraction over the given capability provider
    ///
    /// Errors when no columns are declared.
    pub fn new(
        capability: Arc<dyn TableCapability>,
        columns: impl IntoIterator<Item = impl Into<ColumnSpec>>,
    ) -> Result<Self, ConfigurationError> {
        let columns: Vec<ColumnSpec> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ConfigurationError::EmptyDeclaration {
                strategy: "extract columns",
            });
        }
        Ok(Self::from_parts(capability, columns, None))
    }

    pub(crate) fn from_parts(
        capability: Arc<dyn TableCapability>,
        columns: Vec<ColumnSpec>,
        fill_with: Option<Value>,
    ) -> Self {
        Self {
            capability,
            columns,
            fill_with,
        }
    }

    /// Materialize absent declared columns with this value instead of erroring
    ///
    /// `Null`, `0`, `false`, and `""` are all legitimate fill values; only
    /// leaving this unset makes absence an error.
    pub fn fill_with(mut self, fill: impl Into<Value>) -> Self {
        self.fill_with = Some(fill.into());
        self
    }

    pub(crate) fn validate_return_type(
        capability: &dyn TableCapability,
        function: &FunctionDef,
    ) -> Result<(), ValidationError> {
        capability
            .column_type(function.return_type())
            .map(|_| ())
            .map_err(|_| ValidationError::UnsupportedReturnType {
                function: function.name().to_string(),
                actual: function.return_type(),
            })
    }
}

impl fmt::Debug for ExtractColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractColumns")
            .field("columns", &self.columns)
            .field("fill_with", &self.fill_with)
            .finish_non_exhaustive()
    }
}

impl NodeExpander for ExtractColumns {
    fn validate(&self, function: &FunctionDef) -> Result<(), ValidationError> {
        Self::validate_return_type(self.capability.as_ref(), function)
    }

    fn expand(
        &self,
        node: &Node,
        _config: &ExpandConfig,
        _function: &FunctionDef,
    ) -> Result<Vec<Node>, ValidationError> {
        let series_type = self.capability.column_type(node.data_type).map_err(|_| {
            ValidationError::UnsupportedReturnType {
                function: node.name.clone(),
                actual: node.data_type,
            }
        })?;

        // Table node: base callable plus the default-fill pass
        let base = node.callable().clone();
        let capability = self.capability.clone();
        let fill_with = self.fill_with.clone();
        let declared: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let generator: Arc<NodeFn> = Arc::new(move |inputs: &NodeInputs| {
            let mut table = base(inputs)?;
            if let Some(fill) = &fill_with {
                for column in &declared {
                    if !capability.has_column(&table, column) {
                        capability.fill_with_scalar(&mut table, column, fill);
                        debug_assert!(capability.has_column(&table, column));
                    }
                }
            }
            Ok(table)
        });

        let mut nodes = vec![node.copy_with(generator)];
        for spec in &self.columns {
            nodes.push(extract_column_node(node, spec, series_type, &self.capability));
        }
        log::debug!(
            "extracting {} column(s) from table node '{}'",
            self.columns.len(),
            node.name
        );
        Ok(nodes)
    }
}

/// Build the extractor node for a single declared column
fn extract_column_node(
    node: &Node,
    spec: &ColumnSpec,
    series_type: DataType,
    capability: &Arc<dyn TableCapability>,
) -> Node {
    let documentation = spec
        .documentation
        .clone()
        .or_else(|| node.documentation.clone());
    let producer = node.name.clone();
    let column = spec.name.clone();
    let capability = capability.clone();
    let callable: Arc<NodeFn> = Arc::new(move |inputs: &NodeInputs| {
        let table = inputs.get(&producer).ok_or_else(|| CallError::MissingInput {
            node: column.clone(),
            input: producer.clone(),
        })?;
        capability
            .get_column(table, &column)
            .ok_or_else(|| CallError::ColumnNotFound {
                column: column.clone(),
                producer: producer.clone(),
                available: capability.column_names(table),
            })
    });

    let mut input_types = HashMap::new();
    input_types.insert(node.name.clone(), node.data_type);
    Node::new(
        spec.name.clone(),
        series_type,
        documentation,
        callable,
        input_types,
        node.tags.clone(),
    )
}

/// Expansion strategy that splits a mapping-producing function per field
///
/// Same two-tier pattern as [`ExtractColumns`], for mapping-shaped
/// outputs. Field types are taken from the declaration rather than
/// inferred.
#[derive(Debug)]
pub struct ExtractFields {
    fields: IndexMap<String, DataType>,
    fill_with: Option<Value>,
}

impl ExtractFields {
    /// Create a field extraction from `field name -> declared type` pairs
    ///
    /// Errors when no fields are declared.
    pub fn new(
        fields: impl IntoIterator<Item = (impl Into<String>, DataType)>,
    ) -> Result<Self, ConfigurationError> {
        let fields: IndexMap<String, DataType> = fields
            .into_iter()
            .map(|(name, data_type)| (name.into(), data_type))
            .collect();
        if fields.is_empty() {
            return Err(ConfigurationError::EmptyDeclaration {
                strategy: "extract fields",
            });
        }
        Ok(Self {
            fields,
            fill_with: None,
        })
    }

    /// Materialize absent declared fields with this value instead of erroring
    pub fn fill_with(mut self, fill: impl Into<Value>) -> Self {
        self.fill_with = Some(fill.into());
        self
    }
}

impl NodeExpander for ExtractFields {
    fn validate(&self, function: &FunctionDef) -> Result<(), ValidationError> {
        if function.return_type().shape() != OutputShape::Mapping {
            return Err(ValidationError::NotAMapping {
                function: function.name().to_string(),
                actual: function.return_type(),
            });
        }
        Ok(())
    }

    fn expand(
        &self,
        node: &Node,
        _config: &ExpandConfig,
        _function: &FunctionDef,
    ) -> Result<Vec<Node>, ValidationError> {
        // Mapping node: base callable plus the default-fill pass
        let base = node.callable().clone();
        let producer = node.name.clone();
        let fill_with = self.fill_with.clone();
        let declared: Vec<String> = self.fields.keys().cloned().collect();
        let generator: Arc<NodeFn> = Arc::new(move |inputs: &NodeInputs| {
            let mut mapping = base(inputs)?;
            if let Some(fill) = &fill_with {
                let entries =
                    mapping
                        .as_object_mut()
                        .ok_or_else(|| CallError::UnexpectedShape {
                            node: producer.clone(),
                            expected: "mapping",
                        })?;
                for field in &declared {
                    if !entries.contains_key(field) {
                        entries.insert(field.clone(), fill.clone());
                    }
                }
            }
            Ok(mapping)
        });

        let mut nodes = vec![node.copy_with(generator)];
        for (field, field_type) in &self.fields {
            nodes.push(extract_field_node(node, field, *field_type));
        }
        Ok(nodes)
    }
}

/// Build the extractor node for a single declared field
fn extract_field_node(node: &Node, field: &str, field_type: DataType) -> Node {
    let producer = node.name.clone();
    let field_name = field.to_string();
    let callable: Arc<NodeFn> = Arc::new(move |inputs: &NodeInputs| {
        let mapping = inputs.get(&producer).ok_or_else(|| CallError::MissingInput {
            node: field_name.clone(),
            input: producer.clone(),
        })?;
        let entries = mapping
            .as_object()
            .ok_or_else(|| CallError::UnexpectedShape {
                node: producer.clone(),
                expected: "mapping",
            })?;
        entries
            .get(&field_name)
            .cloned()
            .ok_or_else(|| CallError::FieldNotFound {
                field: field_name.clone(),
                producer: producer.clone(),
                available: entries.keys().cloned().collect(),
            })
    });

    let mut input_types = HashMap::new();
    input_types.insert(node.name.clone(), DataType::Mapping);
    Node::new(
        field,
        field_type,
        node.documentation.clone(),
        callable,
        input_types,
        node.tags.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::apply;
    use graphloom_node_contracts::JsonTableCapability;
    use serde_json::json;

    fn capability() -> Arc<dyn TableCapability> {
        Arc::new(JsonTableCapability::new())
    }

    /// Produces a two-column table from no inputs
    fn table_fn() -> FunctionDef {
        FunctionDef::new("two_columns", DataType::Table, |_| {
            Ok(json!({"c1": [1, 2], "c2": [3, 4]}))
        })
        .with_doc("Base table doc.")
    }

    fn mapping_fn() -> FunctionDef {
        FunctionDef::new("pair", DataType::Mapping, |_| {
            Ok(json!({"left": 1, "right": "two"}))
        })
        .with_doc("Base mapping doc.")
    }

    #[test]
    fn test_extract_columns_produces_table_plus_column_nodes() {
        let strategy =
            ExtractColumns::new(capability(), [ColumnSpec::from("c1"), ("c2", "doc2").into()])
                .unwrap();
        let nodes = apply(&strategy, &table_fn(), &ExpandConfig::new()).unwrap();
        assert_eq!(nodes.len(), 3);

        assert_eq!(nodes[0].name, "two_columns");
        assert_eq!(nodes[0].data_type, DataType::Table);

        let c1 = &nodes[1];
        assert_eq!(c1.name, "c1");
        assert_eq!(c1.data_type, DataType::Series);
        // Bare name inherits the base documentation
        assert_eq!(c1.documentation.as_deref(), Some("Base table doc."));
        assert_eq!(c1.input_types["two_columns"], DataType::Table);

        let c2 = &nodes[2];
        assert_eq!(c2.documentation.as_deref(), Some("doc2"));
    }

    #[test]
    fn test_extractor_pulls_column_from_table_input() {
        let strategy = ExtractColumns::new(capability(), ["c1"]).unwrap();
        let nodes = apply(&strategy, &table_fn(), &ExpandConfig::new()).unwrap();

        let table = nodes[0].invoke(&NodeInputs::new()).unwrap();
        let mut inputs = NodeInputs::new();
        inputs.insert("two_columns".to_string(), table.clone());
        assert_eq!(nodes[1].invoke(&inputs).unwrap(), json!([1, 2]));

        // Extraction never mutates the original container
        assert_eq!(inputs["two_columns"], table);
        assert_eq!(table, json!({"c1": [1, 2], "c2": [3, 4]}));
    }

    #[test]
    fn test_absent_column_without_fill_errors_with_present_columns() {
        let strategy = ExtractColumns::new(capability(), ["missing"]).unwrap();
        let nodes = apply(&strategy, &table_fn(), &ExpandConfig::new()).unwrap();

        let mut inputs = NodeInputs::new();
        inputs.insert(
            "two_columns".to_string(),
            json!({"c1": [1], "c2": [2]}),
        );
        match nodes[1].invoke(&inputs).unwrap_err() {
            CallError::ColumnNotFound {
                column, available, ..
            } => {
                assert_eq!(column, "missing");
                assert_eq!(available, vec!["c1", "c2"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_absent_column_with_fill_is_materialized() {
        let strategy = ExtractColumns::new(capability(), ["c1", "filled"])
            .unwrap()
            .fill_with(json!(0.0));
        let nodes = apply(&strategy, &table_fn(), &ExpandConfig::new()).unwrap();

        let table = nodes[0].invoke(&NodeInputs::new()).unwrap();
        let mut inputs = NodeInputs::new();
        inputs.insert("two_columns".to_string(), table);
        // Every row equals the configured default
        assert_eq!(nodes[2].invoke(&inputs).unwrap(), json!([0.0, 0.0]));
    }

    #[test]
    fn test_zero_fill_is_a_real_fill_value() {
        let strategy = ExtractColumns::new(capability(), ["absent"])
            .unwrap()
            .fill_with(json!(0));
        let nodes = apply(&strategy, &table_fn(), &ExpandConfig::new()).unwrap();
        let table = nodes[0].invoke(&NodeInputs::new()).unwrap();
        let mut inputs = NodeInputs::new();
        inputs.insert("two_columns".to_string(), table);
        assert_eq!(nodes[1].invoke(&inputs).unwrap(), json!([0, 0]));
    }

    #[test]
    fn test_strategies_are_debuggable() {
        let columns = ExtractColumns::new(capability(), ["c1"]).unwrap();
        let rendered = format!("{columns:?}");
        assert!(rendered.contains("ExtractColumns"));
        assert!(rendered.contains("c1"));

        let fields = ExtractFields::new([("f", DataType::Number)]).unwrap();
        assert!(format!("{fields:?}").contains("ExtractFields"));
    }

    #[test]
    fn test_empty_columns_is_configuration_error() {
        let err = ExtractColumns::new(capability(), Vec::<ColumnSpec>::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyDeclaration { .. }));
    }

    #[test]
    fn test_non_table_return_type_rejected() {
        let scalar_fn = FunctionDef::new("scalar", DataType::Number, |_| Ok(json!(1)));
        let strategy = ExtractColumns::new(capability(), ["c1"]).unwrap();
        assert!(matches!(
            strategy.validate(&scalar_fn).unwrap_err(),
            ValidationError::UnsupportedReturnType { .. }
        ));
    }

    #[test]
    fn test_extract_fields_produces_mapping_plus_field_nodes() {
        let strategy = ExtractFields::new([
            ("left", DataType::Number),
            ("right", DataType::String),
        ])
        .unwrap();
        let nodes = apply(&strategy, &mapping_fn(), &ExpandConfig::new()).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].name, "pair");

        let left = &nodes[1];
        // Declared type, not inferred
        assert_eq!(left.data_type, DataType::Number);
        assert_eq!(left.input_types["pair"], DataType::Mapping);

        let mapping = nodes[0].invoke(&NodeInputs::new()).unwrap();
        let mut inputs = NodeInputs::new();
        inputs.insert("pair".to_string(), mapping);
        assert_eq!(left.invoke(&inputs).unwrap(), json!(1));
        assert_eq!(nodes[2].invoke(&inputs).unwrap(), json!("two"));
    }

    #[test]
    fn test_absent_field_without_fill_errors_with_present_keys() {
        let strategy = ExtractFields::new([("missing", DataType::Number)]).unwrap();
        let nodes = apply(&strategy, &mapping_fn(), &ExpandConfig::new()).unwrap();

        let mut inputs = NodeInputs::new();
        inputs.insert("pair".to_string(), json!({"left": 1, "right": "two"}));
        match nodes[1].invoke(&inputs).unwrap_err() {
            CallError::FieldNotFound {
                field, available, ..
            } => {
                assert_eq!(field, "missing");
                assert_eq!(available, vec!["left", "right"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_absent_field_with_fill_is_materialized() {
        let strategy = ExtractFields::new([("extra", DataType::Number)])
            .unwrap()
            .fill_with(json!(7));
        let nodes = apply(&strategy, &mapping_fn(), &ExpandConfig::new()).unwrap();

        let mapping = nodes[0].invoke(&NodeInputs::new()).unwrap();
        assert_eq!(mapping["extra"], json!(7));
        let mut inputs = NodeInputs::new();
        inputs.insert("pair".to_string(), mapping);
        assert_eq!(nodes[1].invoke(&inputs).unwrap(), json!(7));
    }

    #[test]
    fn test_empty_fields_is_configuration_error() {
        let err =
            ExtractFields::new(Vec::<(String, DataType)>::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyDeclaration { .. }));
    }

    #[test]
    fn test_non_mapping_return_type_rejected() {
        let strategy = ExtractFields::new([("f", DataType::Number)]).unwrap();
        assert!(matches!(
            strategy.validate(&table_fn()).unwrap_err(),
            ValidationError::NotAMapping { .. }
        ));
    }
}
