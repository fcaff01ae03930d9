//! Table capability provider
//!
//! Structured-table operations live behind this narrow interface so the
//! expansion engine never depends on a concrete dataframe library. The
//! engine only ever asks for column presence, column lookup, default-fill,
//! and label reassignment; content validation belongs elsewhere.

use serde_json::Value;
use thiserror::Error;

use crate::types::DataType;

/// Raised when a declared return type is not a recognized table type
#[derive(Debug, Error)]
#[error("Type {0:?} is not a recognized table type")]
pub struct UnsupportedTypeError(pub DataType);

/// Column-level operations over table-shaped values
///
/// Implementations must be cheap to share; strategies hold them behind an
/// `Arc` and close over them in produced callables.
pub trait TableCapability: Send + Sync {
    /// The per-column type associated with a recognized table type
    fn column_type(&self, table_type: DataType) -> Result<DataType, UnsupportedTypeError>;

    /// Whether the table carries a column with this name
    fn has_column(&self, table: &Value, name: &str) -> bool;

    /// The names of the columns the table actually carries
    fn column_names(&self, table: &Value) -> Vec<String>;

    /// Look up a column by name
    fn get_column(&self, table: &Value, name: &str) -> Option<Value>;

    /// Materialize a column filled with a scalar, one entry per row
    fn fill_with_scalar(&self, table: &mut Value, name: &str, fill: &Value);

    /// Overwrite the table's column labels, in order
    ///
    /// Callers must supply exactly as many names as the table has
    /// columns; a mismatch is checked before this is invoked.
    fn reassign_columns(&self, table: &mut Value, names: &[String]);
}

/// Reference capability over column-major JSON tables
///
/// A table is a JSON object mapping column name to an array of row
/// values. Column order is the object's insertion order.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTableCapability;

impl JsonTableCapability {
    /// Create a new JSON table capability
    pub fn new() -> Self {
        Self
    }
}

impl TableCapability for JsonTableCapability {
    fn column_type(&self, table_type: DataType) -> Result<DataType, UnsupportedTypeError> {
        match table_type {
            DataType::Table => Ok(DataType::Series),
            other => Err(UnsupportedTypeError(other)),
        }
    }

    fn has_column(&self, table: &Value, name: &str) -> bool {
        table
            .as_object()
            .map_or(false, |columns| columns.contains_key(name))
    }

    fn column_names(&self, table: &Value) -> Vec<String> {
        table
            .as_object()
            .map(|columns| columns.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_column(&self, table: &Value, name: &str) -> Option<Value> {
        table.as_object().and_then(|columns| columns.get(name)).cloned()
    }

    fn fill_with_scalar(&self, table: &mut Value, name: &str, fill: &Value) {
        if let Some(columns) = table.as_object_mut() {
            let rows = columns
                .values()
                .find_map(|col| col.as_array().map(|a| a.len()))
                .unwrap_or(0);
            columns.insert(name.to_string(), Value::Array(vec![fill.clone(); rows]));
        }
    }

    fn reassign_columns(&self, table: &mut Value, names: &[String]) {
        if let Some(columns) = table.as_object_mut() {
            let values: Vec<Value> = columns.values().cloned().collect();
            columns.clear();
            for (name, value) in names.iter().zip(values) {
                columns.insert(name.clone(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_type() {
        let cap = JsonTableCapability::new();
        assert_eq!(cap.column_type(DataType::Table).unwrap(), DataType::Series);
        assert!(cap.column_type(DataType::Number).is_err());
    }

    #[test]
    fn test_column_lookup() {
        let cap = JsonTableCapability::new();
        let table = json!({"x": [1, 2], "y": [3, 4]});
        assert!(cap.has_column(&table, "x"));
        assert!(!cap.has_column(&table, "z"));
        assert_eq!(cap.get_column(&table, "y").unwrap(), json!([3, 4]));
        assert_eq!(cap.column_names(&table), vec!["x", "y"]);
    }

    #[test]
    fn test_fill_with_scalar_matches_row_count() {
        let cap = JsonTableCapability::new();
        let mut table = json!({"x": [1, 2, 3]});
        cap.fill_with_scalar(&mut table, "filled", &json!(0.0));
        assert_eq!(cap.get_column(&table, "filled").unwrap(), json!([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_fill_with_scalar_empty_table() {
        let cap = JsonTableCapability::new();
        let mut table = json!({});
        cap.fill_with_scalar(&mut table, "filled", &json!(1));
        assert_eq!(cap.get_column(&table, "filled").unwrap(), json!([]));
    }

    #[test]
    fn test_reassign_columns_in_order() {
        let cap = JsonTableCapability::new();
        let mut table = json!({"a": [1], "b": [2]});
        cap.reassign_columns(&mut table, &["x".to_string(), "y".to_string()]);
        assert_eq!(cap.column_names(&table), vec!["x", "y"]);
        assert_eq!(cap.get_column(&table, "x").unwrap(), json!([1]));
        assert_eq!(cap.get_column(&table, "y").unwrap(), json!([2]));
    }
}
