//! Docstring templating
//!
//! Documentation strings may carry `{placeholder}` markers. Formatting
//! substitutes the reserved `{output_name}` placeholder with the produced
//! node's name, and `{param}` with the bound literal value or referenced
//! upstream name for every parameter in the output's dependency mapping.
//! Unrecognized placeholders are left verbatim, so formatting is
//! idempotent on them.

use indexmap::IndexMap;
use serde_json::Value;

use crate::dependencies::Dependency;

/// Reserved placeholder keyword for the produced node's name
///
/// A declared function parameter may not use this name; `validate`
/// rejects the collision before expansion.
pub const RESERVED_KWARG: &str = "output_name";

/// Format a documentation template for one produced output
///
/// Returns the explicit override unchanged when one was supplied for this
/// output, `None` when there is no template, and the substituted template
/// otherwise.
pub fn format_docstring(
    template: Option<&str>,
    override_doc: Option<&str>,
    output_name: &str,
    bindings: &IndexMap<String, Dependency>,
) -> Option<String> {
    if let Some(doc) = override_doc {
        return Some(doc.to_string());
    }
    let template = template?;
    Some(substitute(template, |key| {
        if key == RESERVED_KWARG {
            return Some(output_name.to_string());
        }
        bindings.get(key).map(|dep| match dep {
            Dependency::Literal(v) => render_literal(v),
            Dependency::Reference(name) => name.clone(),
        })
    }))
}

/// Render a literal binding for interpolation
///
/// Strings interpolate without surrounding quotes; everything else uses
/// its JSON rendering.
fn render_literal(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace each `{key}` the resolver recognizes, leaving the rest intact
fn substitute(template: &str, resolve: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // Unterminated placeholder, copy through
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match resolve(key) {
            Some(replacement) => out.push_str(&replacement),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependencies::{source, value};
    use serde_json::json;

    fn bindings() -> IndexMap<String, Dependency> {
        let mut map = IndexMap::new();
        map.insert("literal_parameter".to_string(), value("bar"));
        map.insert("upstream_parameter".to_string(), source("foo_source"));
        map
    }

    #[test]
    fn test_substitutes_all_placeholder_kinds() {
        let doc = format_docstring(
            Some("Adding {literal_parameter} to {upstream_parameter} to create {output_name}."),
            None,
            "combined",
            &bindings(),
        );
        assert_eq!(
            doc.as_deref(),
            Some("Adding bar to foo_source to create combined.")
        );
    }

    #[test]
    fn test_none_template_passes_through() {
        assert_eq!(format_docstring(None, None, "out", &bindings()), None);
    }

    #[test]
    fn test_override_bypasses_templating() {
        let doc = format_docstring(
            Some("{literal_parameter}"),
            Some("explicit doc"),
            "out",
            &bindings(),
        );
        assert_eq!(doc.as_deref(), Some("explicit doc"));
    }

    #[test]
    fn test_unknown_placeholders_left_verbatim_and_idempotent() {
        let once = format_docstring(Some("keep {unknown} as-is"), None, "out", &bindings()).unwrap();
        assert_eq!(once, "keep {unknown} as-is");
        let twice = format_docstring(Some(&once), None, "out", &bindings()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_non_string_literal_renders_as_json() {
        let mut map = IndexMap::new();
        map.insert("n".to_string(), value(json!(10)));
        let doc = format_docstring(Some("n is {n}"), None, "out", &map).unwrap();
        assert_eq!(doc, "n is 10");
    }

    #[test]
    fn test_unterminated_placeholder_copied_through() {
        let doc = format_docstring(Some("broken {placeholder"), None, "out", &bindings()).unwrap();
        assert_eq!(doc, "broken {placeholder");
    }
}
