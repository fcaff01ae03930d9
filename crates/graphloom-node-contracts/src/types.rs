//! Declared data types for node outputs and inputs
//!
//! Graphloom reads declared annotations; it performs no type inference.
//! The closed set of type tags below is all the engine ever dispatches on.

use serde::{Deserialize, Serialize};

/// The declared data type of a node output or input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Accepts any type
    Any,
    /// Boolean value
    Boolean,
    /// Numeric value
    Number,
    /// Text string
    String,
    /// Arbitrary JSON value
    Json,
    /// A single column of a table
    Series,
    /// A structured, column-addressable table
    Table,
    /// A key-value mapping
    Mapping,
}

/// The structural shape of a produced value
///
/// Extraction strategies dispatch on this closed set rather than
/// introspecting generic type parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputShape {
    /// Column-addressable table
    Table,
    /// Key-value mapping
    Mapping,
    /// Everything else
    Scalar,
}

impl DataType {
    /// The structural shape of values carrying this type
    pub fn shape(&self) -> OutputShape {
        match self {
            DataType::Table => OutputShape::Table,
            DataType::Mapping => OutputShape::Mapping,
            _ => OutputShape::Scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_tags() {
        assert_eq!(DataType::Table.shape(), OutputShape::Table);
        assert_eq!(DataType::Mapping.shape(), OutputShape::Mapping);
        assert_eq!(DataType::Number.shape(), OutputShape::Scalar);
        assert_eq!(DataType::Series.shape(), OutputShape::Scalar);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&DataType::Series).unwrap();
        assert_eq!(json, "\"series\"");
    }
}
