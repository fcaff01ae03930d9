//! Dependency specifications for parameter substitution
//!
//! A [`Dependency`] is the atomic unit of parameterization: either a
//! literal constant bound directly to a parameter, or a reference to
//! another node's output supplied under a (possibly different) local
//! parameter name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parameter substitution: literal value or upstream reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Dependency {
    /// A fixed value substituted directly as a keyword argument
    Literal(Value),
    /// The name of another node whose output supplies this parameter
    Reference(String),
}

impl Dependency {
    /// Whether this is a literal binding
    pub fn is_literal(&self) -> bool {
        matches!(self, Dependency::Literal(_))
    }

    /// Whether this is an upstream reference
    pub fn is_reference(&self) -> bool {
        matches!(self, Dependency::Reference(_))
    }
}

/// Bind a parameter to a fixed literal value
pub fn value(v: impl Into<Value>) -> Dependency {
    Dependency::Literal(v.into())
}

/// Bind a parameter to the output of an upstream node
pub fn source(name: impl Into<String>) -> Dependency {
    Dependency::Reference(name.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors() {
        assert_eq!(value(1), Dependency::Literal(json!(1)));
        assert_eq!(value("bar"), Dependency::Literal(json!("bar")));
        assert_eq!(source("upstream"), Dependency::Reference("upstream".to_string()));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(value(json!({"k": 1})).is_literal());
        assert!(source("n").is_reference());
        assert!(!source("n").is_literal());
    }
}
