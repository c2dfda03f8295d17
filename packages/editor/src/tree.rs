//! # Document Editor Tree
//!
//! One recursive walk turns any document into a tree of widget
//! descriptions. Front-ends draw the tree however they like and route
//! user input back to the node it belongs to; each node answers with an
//! [`EditEvent`] addressed by the full path from the document root.
//!
//! ```text
//! render(value, path)
//!   ├─ object          → fields (primitives first), then nested blocks
//!   ├─ array<scalar>   → one lines area, one item per line (append when empty)
//!   ├─ array<object>   → removable item blocks + append
//!   └─ scalar          → checkbox / number input / text input / text area
//! ```
//!
//! Nodes hold nothing but data derived from the document they were
//! rendered from. After an edit the caller re-renders; paths are never
//! cached across renders.

use crate::document::Value;
use crate::mutations::EditEvent;
use crate::path::{Path, PathKey};
use crate::shape::{self, Shape};
use serde_json::Number;
use std::sync::Arc;

/// Element synthesized when appending to an empty item list
pub const FALLBACK_ITEM_KEYS: &[&str] = &["name", "value"];

fn fallback_item() -> Value {
    Value::object(FALLBACK_ITEM_KEYS.iter().map(|k| (*k, Value::from(""))))
}

/// Input control for a scalar
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Checkbox(bool),

    NumberInput(Number),

    TextInput(String),

    TextArea(String),
}

/// One scalar field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub path: Path,
    pub label: String,
    pub widget: Widget,

    /// The stored value is null, so the first input decides its type
    pub unset: bool,
}

impl FieldNode {
    /// Store text verbatim
    pub fn set_text(&self, text: impl Into<String>) -> EditEvent {
        EditEvent::new(self.path.clone(), Value::from(text.into()))
    }

    pub fn set_checked(&self, checked: bool) -> EditEvent {
        EditEvent::new(self.path.clone(), checked)
    }

    /// Empty input clears the number; unparsable input produces no edit
    pub fn set_number(&self, raw: &str) -> Option<EditEvent> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(EditEvent::new(self.path.clone(), Value::Null));
        }

        parse_number(raw).map(|n| EditEvent::new(self.path.clone(), Value::Number(n)))
    }

    /// First input for a null leaf: empty stays null, numbers are stored
    /// as numbers, anything else as text
    pub fn fill(&self, raw: &str) -> EditEvent {
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() {
            Value::Null
        } else {
            parse_number(trimmed)
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(raw))
        };
        EditEvent::new(self.path.clone(), value)
    }

    /// Raw user input interpreted by the widget kind
    pub fn input(&self, raw: &str) -> Option<EditEvent> {
        match self.widget {
            Widget::Checkbox(_) => parse_flag(raw).map(|b| self.set_checked(b)),
            Widget::NumberInput(_) => self.set_number(raw),
            Widget::TextInput(_) if self.unset => Some(self.fill(raw)),
            Widget::TextInput(_) | Widget::TextArea(_) => Some(self.set_text(raw)),
        }
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(int.into());
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Object: scalar fields first, then nested blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub path: Path,
    pub label: String,
    pub fields: Vec<FieldNode>,
    pub children: Vec<EditorNode>,
}

/// Sequence of scalars, edited as one item per line
#[derive(Debug, Clone, PartialEq)]
pub struct LinesNode {
    pub path: Path,
    pub label: String,
    pub text: String,

    /// Number of members
    pub count: usize,
}

impl LinesNode {
    /// Split on line breaks, trim, drop blank lines; replaces the whole sequence
    pub fn set_text(&self, text: &str) -> EditEvent {
        let items = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Value::from);

        EditEvent::new(self.path.clone(), Value::array(items))
    }

    /// An empty sequence has no first element to copy, so it takes the
    /// fallback item. None once it has members.
    pub fn append(&self) -> Option<EditEvent> {
        (self.count == 0)
            .then(|| EditEvent::new(self.path.clone(), Value::array([fallback_item()])))
    }
}

/// Sequence containing objects
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsNode {
    pub path: Path,
    pub label: String,
    pub items: Vec<ItemNode>,
    source: Arc<Vec<Value>>,
}

/// One removable element of an [`ItemsNode`]
#[derive(Debug, Clone, PartialEq)]
pub struct ItemNode {
    pub index: usize,
    pub body: ObjectNode,
}

impl ItemNode {
    /// 1-based position for humans
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

impl ItemsNode {
    /// Append an element with the first element's keys, values cleared
    pub fn append(&self) -> EditEvent {
        let template = match self.source.first() {
            Some(first @ Value::Object(_)) => first.cleared(),
            _ => fallback_item(),
        };

        let mut items = Vec::clone(&self.source);
        items.push(template);
        EditEvent::new(self.path.clone(), Value::from(items))
    }

    /// Remove the element at `index`; None when out of range
    pub fn remove(&self, index: usize) -> Option<EditEvent> {
        if index >= self.source.len() {
            return None;
        }

        let items = self
            .source
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone());
        Some(EditEvent::new(self.path.clone(), Value::array(items)))
    }
}

/// Rendered document node
#[derive(Debug, Clone, PartialEq)]
pub enum EditorNode {
    Field(FieldNode),
    Object(ObjectNode),
    Lines(LinesNode),
    Items(ItemsNode),
}

/// Borrowed view of any rendered node, as returned by [`EditorNode::find`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Field(&'a FieldNode),
    Object(&'a ObjectNode),
    Lines(&'a LinesNode),
    Items(&'a ItemsNode),
}

impl EditorNode {
    pub fn path(&self) -> &Path {
        match self {
            EditorNode::Field(node) => &node.path,
            EditorNode::Object(node) => &node.path,
            EditorNode::Lines(node) => &node.path,
            EditorNode::Items(node) => &node.path,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EditorNode::Field(node) => &node.label,
            EditorNode::Object(node) => &node.label,
            EditorNode::Lines(node) => &node.label,
            EditorNode::Items(node) => &node.label,
        }
    }

    fn as_ref(&self) -> NodeRef<'_> {
        match self {
            EditorNode::Field(node) => NodeRef::Field(node),
            EditorNode::Object(node) => NodeRef::Object(node),
            EditorNode::Lines(node) => NodeRef::Lines(node),
            EditorNode::Items(node) => NodeRef::Items(node),
        }
    }

    /// Locate the node rendered for `path`
    pub fn find(&self, path: &Path) -> Option<NodeRef<'_>> {
        if !path.starts_with(self.path()) {
            return None;
        }
        if self.path() == path {
            return Some(self.as_ref());
        }

        match self {
            EditorNode::Object(node) => find_in_object(node, path),
            EditorNode::Items(node) => {
                let PathKey::Index(index) = path.keys().get(node.path.len())? else {
                    return None;
                };
                let item = node.items.get(*index)?;
                if item.body.path == *path {
                    return Some(NodeRef::Object(&item.body));
                }
                find_in_object(&item.body, path)
            }
            EditorNode::Field(_) | EditorNode::Lines(_) => None,
        }
    }
}

fn find_in_object<'a>(node: &'a ObjectNode, path: &Path) -> Option<NodeRef<'a>> {
    if let Some(field) = node.fields.iter().find(|f| f.path == *path) {
        return Some(NodeRef::Field(field));
    }
    node.children.iter().find_map(|child| child.find(path))
}

/// Render `value`, found at `path`, into an editor tree
pub fn render(value: &Value, path: &Path) -> EditorNode {
    let key_hint = path.field_hint();
    let label = key_hint.map(shape::label).unwrap_or_default();

    match shape::classify(value, key_hint) {
        Shape::ObjectOf(_) => EditorNode::Object(render_object(value, path, label)),
        Shape::ArrayOfScalars(items) => EditorNode::Lines(LinesNode {
            path: path.clone(),
            label,
            text: items
                .iter()
                .map(Value::display_text)
                .collect::<Vec<_>>()
                .join("\n"),
            count: items.len(),
        }),
        Shape::ArrayOfObjects(_) => {
            let source = match value {
                Value::Array(items) => Arc::clone(items),
                _ => Arc::new(Vec::new()),
            };
            let items = source
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let item_path = path.child(index);
                    ItemNode {
                        index,
                        body: render_object(item, &item_path, format!("{} {}", label, index + 1)),
                    }
                })
                .collect();

            EditorNode::Items(ItemsNode {
                path: path.clone(),
                label,
                items,
                source,
            })
        }
        scalar => EditorNode::Field(render_field(value, path, label, scalar)),
    }
}

/// Object editor; any non-object value gets an editor with no fields
fn render_object(value: &Value, path: &Path, label: String) -> ObjectNode {
    let mut fields = Vec::new();
    let mut children = Vec::new();

    if let Some(map) = value.as_object() {
        for (key, member) in map.iter() {
            let member_path = path.child(key.as_str());
            if member.is_container() {
                children.push(render(member, &member_path));
            } else {
                let shape = shape::classify(member, Some(key));
                fields.push(render_field(member, &member_path, shape::label(key), shape));
            }
        }
    }

    ObjectNode {
        path: path.clone(),
        label,
        fields,
        children,
    }
}

fn render_field(value: &Value, path: &Path, label: String, shape: Shape<'_>) -> FieldNode {
    let widget = match shape {
        Shape::Boolean(b) => Widget::Checkbox(b),
        Shape::Number(n) => Widget::NumberInput(n.clone()),
        Shape::ScalarText { multiline: true } => Widget::TextArea(value.display_text()),
        _ => Widget::TextInput(value.display_text()),
    };

    FieldNode {
        path: path.clone(),
        label,
        widget,
        unset: value.is_null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        Value::from_json_str(text).unwrap()
    }

    fn root_object(value: &Value) -> ObjectNode {
        match render(value, &Path::root()) {
            EditorNode::Object(node) => node,
            other => panic!("Expected object node, got {:?}", other),
        }
    }

    #[test]
    fn test_primitives_before_containers() {
        let d = doc(r#"{"sites":[{"name":"HQ"}],"client":"Acme","staging":{"doa":false},"timeline":"2w"}"#);
        let root = root_object(&d);

        let field_paths: Vec<String> = root.fields.iter().map(|f| f.path.to_string()).collect();
        assert_eq!(field_paths, vec!["client", "timeline"]);

        let child_paths: Vec<String> = root.children.iter().map(|c| c.path().to_string()).collect();
        assert_eq!(child_paths, vec!["sites", "staging"]);
    }

    #[test]
    fn test_widgets() {
        let d = doc(r#"{"ic_used":true,"qty":6,"pm":"","notes_raw":"x","missing":null}"#);
        let root = root_object(&d);
        let widgets: Vec<&Widget> = root.fields.iter().map(|f| &f.widget).collect();

        assert_eq!(widgets[0], &Widget::Checkbox(true));
        assert_eq!(widgets[1], &Widget::NumberInput(6.into()));
        assert_eq!(widgets[2], &Widget::TextInput(String::new()));
        assert_eq!(widgets[3], &Widget::TextArea("x".to_string()));
        assert_eq!(widgets[4], &Widget::TextInput(String::new()));
        assert_eq!(root.fields[1].label, "Qty");
        assert!(root.fields[4].unset);
        assert!(!root.fields[2].unset);
    }

    #[test]
    fn test_leaf_paths_are_absolute() {
        let d = doc(r#"{"sites":[{"name":"HQ","tasks":{"install":{"days":2}}}]}"#);
        let tree = render(&d, &Path::root());

        let days: Path = "sites[0].tasks.install.days".parse().unwrap();
        let Some(NodeRef::Field(field)) = tree.find(&days) else {
            panic!("Expected a field at {}", days);
        };
        assert_eq!(field.path, days);

        let event = field.set_number("3").unwrap();
        assert_eq!(event.path, days);
        assert_eq!(event.value, Value::from(3i64));
    }

    #[test]
    fn test_lines_edit() {
        let d = doc(r#"{"assumptions":["old"]}"#);
        let tree = render(&d, &Path::root());
        let Some(NodeRef::Lines(lines)) = tree.find(&"assumptions".parse().unwrap()) else {
            panic!("Expected lines node");
        };

        assert_eq!(lines.text, "old");
        let event = lines.set_text("a\n\nb\n");
        assert_eq!(event.value, doc(r#"["a","b"]"#));

        let event = lines.set_text("  spaced  \r\n\r\nnext");
        assert_eq!(event.value, doc(r#"["spaced","next"]"#));
    }

    #[test]
    fn test_append_and_remove() {
        let d = doc(r#"{"sites":[{"name":"HQ"}]}"#);
        let tree = render(&d, &Path::root());
        let Some(NodeRef::Items(sites)) = tree.find(&"sites".parse().unwrap()) else {
            panic!("Expected items node");
        };

        let appended = sites.append().apply(&d);
        assert_eq!(appended, doc(r#"{"sites":[{"name":"HQ"},{"name":""}]}"#));

        let tree = render(&appended, &Path::root());
        let Some(NodeRef::Items(sites)) = tree.find(&"sites".parse().unwrap()) else {
            panic!("Expected items node");
        };
        assert_eq!(sites.items.len(), 2);
        assert_eq!(sites.items[1].ordinal(), 2);

        let removed = sites.remove(0).unwrap().apply(&appended);
        assert_eq!(removed, doc(r#"{"sites":[{"name":""}]}"#));
        assert!(sites.remove(5).is_none());
    }

    #[test]
    fn test_list_emptied_by_remove_can_be_refilled() {
        let d = doc(r#"{"sites":[{"name":"HQ"}]}"#);
        let tree = render(&d, &Path::root());
        let Some(NodeRef::Items(sites)) = tree.find(&"sites".parse().unwrap()) else {
            panic!("Expected items node");
        };
        let emptied = sites.remove(0).unwrap().apply(&d);
        assert_eq!(emptied, doc(r#"{"sites":[]}"#));

        let tree = render(&emptied, &Path::root());
        let Some(NodeRef::Lines(sites)) = tree.find(&"sites".parse().unwrap()) else {
            panic!("Expected lines node for an empty list");
        };
        let refilled = sites.append().unwrap().apply(&emptied);
        assert_eq!(refilled, doc(r#"{"sites":[{"name":"","value":""}]}"#));

        let tree = render(&refilled, &Path::root());
        assert!(matches!(
            tree.find(&"sites".parse().unwrap()),
            Some(NodeRef::Items(items)) if items.items.len() == 1
        ));
    }

    #[test]
    fn test_lines_with_members_do_not_append() {
        let d = doc(r#"{"assumptions":["a"]}"#);
        let tree = render(&d, &Path::root());
        let Some(NodeRef::Lines(lines)) = tree.find(&"assumptions".parse().unwrap()) else {
            panic!("Expected lines node");
        };
        assert_eq!(lines.count, 1);
        assert!(lines.append().is_none());
    }

    #[test]
    fn test_append_after_scalar_first_element_uses_fallback() {
        let d = doc(r#"{"rows":["loose",{"name":"HQ"}]}"#);
        let tree = render(&d, &Path::root());
        let Some(NodeRef::Items(rows)) = tree.find(&"rows".parse().unwrap()) else {
            panic!("Expected items node");
        };

        let appended = rows.append().apply(&d);
        assert_eq!(
            appended,
            doc(r#"{"rows":["loose",{"name":"HQ"},{"name":"","value":""}]}"#)
        );
    }

    #[test]
    fn test_cleared_number_accepts_a_number_again() {
        let d = doc(r#"{"counts":{"qty":6}}"#);
        let qty: Path = "counts.qty".parse().unwrap();

        let tree = render(&d, &Path::root());
        let Some(NodeRef::Field(field)) = tree.find(&qty) else {
            panic!("Expected qty field");
        };
        let cleared = field.input("").unwrap().apply(&d);
        assert_eq!(cleared, doc(r#"{"counts":{"qty":null}}"#));

        let tree = render(&cleared, &Path::root());
        let Some(NodeRef::Field(field)) = tree.find(&qty) else {
            panic!("Expected qty field");
        };
        assert_eq!(field.widget, Widget::TextInput(String::new()));
        assert!(field.unset);

        let retyped = field.input("5").unwrap().apply(&cleared);
        assert_eq!(retyped, doc(r#"{"counts":{"qty":5}}"#));
        assert_eq!(field.input(" ").unwrap().value, Value::Null);
        assert_eq!(field.input("six").unwrap().value, Value::from("six"));
    }

    #[test]
    fn test_mixed_array_renders_scalars_as_empty_objects() {
        let d = doc(r#"{"rows":["loose",{"name":"HQ"}]}"#);
        let tree = render(&d, &Path::root());
        let Some(NodeRef::Items(rows)) = tree.find(&"rows".parse().unwrap()) else {
            panic!("Expected items node");
        };

        assert!(rows.items[0].body.fields.is_empty());
        assert_eq!(rows.items[1].body.fields.len(), 1);
        assert_eq!(rows.items[1].body.fields[0].path.to_string(), "rows[1].name");
    }

    #[test]
    fn test_field_input_by_widget() {
        let d = doc(r#"{"doa":false,"qty":1,"client":"A"}"#);
        let root = root_object(&d);

        assert_eq!(root.fields[0].input("yes").unwrap().value, Value::from(true));
        assert!(root.fields[0].input("maybe").is_none());
        assert_eq!(root.fields[1].input("").unwrap().value, Value::Null);
        assert_eq!(root.fields[1].input("2.5").unwrap().value, Value::from(2.5));
        assert!(root.fields[1].input("abc").is_none());
        assert_eq!(root.fields[2].input("  Acme ").unwrap().value, Value::from("  Acme "));
    }
}
