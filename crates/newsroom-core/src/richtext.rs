//! Rich-text to plain-text resolution.
//!
//! The CMS delivers summaries, bodies, and bylines either as plain strings
//! or as structured documents. Scoring only ever sees plain text, so every
//! [`RichField`] goes through a [`TextResolver`] first.
//!
//! Resolvers are total: a document that cannot be understood resolves to
//! the empty string, which scores nothing but never aborts a search.
//!
//! # Supported document shapes
//!
//! | Shape | Example |
//! |-------|---------|
//! | Node tree | `{"nodeType":"document","content":[{"nodeType":"paragraph","content":[{"nodeType":"text","value":"Hi"}]}]}` |
//! | Block array | `[{"_type":"block","children":[{"_type":"span","text":"Hi"}]}]` |
//! | Bare strings / arrays of strings | `["Hi", "there"]` |

use serde_json::{Map, Value};

use crate::models::RichField;

/// Converts a [`RichField`] to plain text.
///
/// Any `Fn(&RichField) -> String` closure is a resolver, so callers can
/// inject their own rendering without defining a type.
pub trait TextResolver {
    fn resolve(&self, field: &RichField) -> String;
}

impl<F> TextResolver for F
where
    F: Fn(&RichField) -> String,
{
    fn resolve(&self, field: &RichField) -> String {
        self(field)
    }
}

/// Default resolver understanding node-tree and block-array documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentResolver;

impl TextResolver for DocumentResolver {
    fn resolve(&self, field: &RichField) -> String {
        match field {
            RichField::Plain(s) => s.clone(),
            RichField::Document(doc) => {
                let mut out = String::new();
                collect(doc, &mut out);
                out.trim().to_string()
            }
        }
    }
}

/// Resolve a field with the [`DocumentResolver`].
pub fn resolve_text(field: &RichField) -> String {
    DocumentResolver.resolve(field)
}

/// Inline node types that must not introduce a word break.
const INLINE_NODES: &[&str] = &[
    "text",
    "hyperlink",
    "entry-hyperlink",
    "asset-hyperlink",
    "resource-hyperlink",
    "embedded-entry-inline",
];

fn collect(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Value::Object(map) => {
            let block = is_block(map);
            if block {
                push_break(out);
            }
            if let Some(Value::String(v)) = map.get("value") {
                out.push_str(v);
            } else if let Some(Value::String(t)) = map.get("text") {
                out.push_str(t);
            }
            if let Some(content) = map.get("content") {
                collect(content, out);
            }
            if let Some(children) = map.get("children") {
                collect(children, out);
            }
            if block {
                push_break(out);
            }
        }
        _ => {}
    }
}

fn is_block(map: &Map<String, Value>) -> bool {
    if let Some(Value::String(node_type)) = map.get("nodeType") {
        return !INLINE_NODES.contains(&node_type.as_str());
    }
    matches!(map.get("_type"), Some(Value::String(t)) if t == "block")
}

fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}
