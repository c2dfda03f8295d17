//! # Shape Inference
//!
//! The one place where assumptions about a document's shape are made.
//! Everything downstream (the editor tree, the CLI renderer) asks
//! [`classify`] which editing strategy fits a value and never inspects
//! runtime kinds itself.

use crate::document::{Map, Value};
use serde_json::Number;

/// Strings longer than this are edited in a multi-line area
pub const MULTILINE_THRESHOLD: usize = 120;

/// Key fragments that imply free-form prose
pub const MULTILINE_KEY_HINTS: &[&str] = &[
    "notes",
    "description",
    "scope",
    "assumptions",
    "constraints",
    "deliverables",
    "questions",
    "summary",
];

/// Editing strategy for a value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    Boolean(bool),

    Number(&'a Number),

    /// Strings and nulls
    ScalarText { multiline: bool },

    ObjectOf(&'a Map),

    /// Every member is a scalar (this includes the empty sequence)
    ArrayOfScalars(&'a [Value]),

    /// At least one member is a container. Non-object members are edited
    /// as objects with no fields.
    ArrayOfObjects(&'a [Value]),
}

/// Pick the editing strategy for `value`, found under the member `key_hint`
pub fn classify<'a>(value: &'a Value, key_hint: Option<&str>) -> Shape<'a> {
    match value {
        Value::Bool(b) => Shape::Boolean(*b),
        Value::Number(n) => Shape::Number(n),
        Value::Array(items) => {
            if items.iter().any(Value::is_container) {
                Shape::ArrayOfObjects(items)
            } else {
                Shape::ArrayOfScalars(items)
            }
        }
        Value::Object(map) => Shape::ObjectOf(map),
        Value::String(s) => Shape::ScalarText {
            multiline: is_multiline(key_hint, s),
        },
        Value::Null => Shape::ScalarText {
            multiline: is_multiline(key_hint, ""),
        },
    }
}

/// Prose-like key, or text too long for one line
pub fn is_multiline(key_hint: Option<&str>, text: &str) -> bool {
    let hinted = key_hint.is_some_and(|key| {
        let key = key.to_lowercase();
        MULTILINE_KEY_HINTS.iter().any(|hint| key.contains(hint))
    });

    hinted || text.chars().count() > MULTILINE_THRESHOLD
}

/// Human label for a key: `project_name` → `Project Name`
pub fn label(key: &str) -> String {
    key.split(['_', '-', '.', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        Value::from_json_str(text).unwrap()
    }

    #[test]
    fn test_runtime_kinds_first() {
        assert_eq!(classify(&Value::from(true), Some("notes")), Shape::Boolean(true));
        assert!(matches!(classify(&doc("3"), Some("scope")), Shape::Number(_)));
    }

    #[test]
    fn test_arrays() {
        let scalars = doc(r#"["a", 1, null, false]"#);
        assert!(matches!(classify(&scalars, None), Shape::ArrayOfScalars(items) if items.len() == 4));

        let empty = doc("[]");
        assert!(matches!(classify(&empty, None), Shape::ArrayOfScalars(items) if items.is_empty()));

        let objects = doc(r#"[{"name":"HQ"}]"#);
        assert!(matches!(classify(&objects, None), Shape::ArrayOfObjects(_)));

        let mixed = doc(r#"["loose", {"name":"HQ"}]"#);
        assert!(matches!(classify(&mixed, None), Shape::ArrayOfObjects(items) if items.len() == 2));
    }

    #[test]
    fn test_multiline_by_key_hint() {
        let short = Value::from("x");
        assert_eq!(classify(&short, Some("notes_raw")), Shape::ScalarText { multiline: true });
        assert_eq!(classify(&short, Some("Scope")), Shape::ScalarText { multiline: true });
        assert_eq!(classify(&short, Some("client")), Shape::ScalarText { multiline: false });
        assert_eq!(classify(&Value::Null, Some("description")), Shape::ScalarText { multiline: true });
    }

    #[test]
    fn test_multiline_by_length() {
        let exact = Value::from("a".repeat(MULTILINE_THRESHOLD));
        let long = Value::from("a".repeat(MULTILINE_THRESHOLD + 1));

        assert_eq!(classify(&exact, Some("client")), Shape::ScalarText { multiline: false });
        assert_eq!(classify(&long, Some("client")), Shape::ScalarText { multiline: true });
    }

    #[test]
    fn test_label() {
        assert_eq!(label("project_name"), "Project Name");
        assert_eq!(label("pm-client"), "Pm Client");
        assert_eq!(label("ooh_windows"), "Ooh Windows");
        assert_eq!(label("__weird__key"), "Weird Key");
        assert_eq!(label(""), "");
    }
}
