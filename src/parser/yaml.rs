//! YAML tree parser — builds the classified [`Document`] model.
//!
//! Classification happens once here. Precedence when an entry fits several
//! shapes: link, then category, then topic with headings, then bare label.
//! Presence checks follow truthiness: null, `false`, `0` and `""` count as
//! absent.

use crate::model::*;
use serde_yaml::{Mapping, Value};

/// Parse YAML source into a [`Document`].
///
/// Structural surprises (root not a mapping, no `sidebars` sequence) give an
/// empty document; only invalid YAML is an error.
pub fn parse(source: &str) -> Result<Document, serde_yaml::Error> {
    let root: Value = serde_yaml::from_str(source)?;
    Ok(build_document(&root))
}

fn build_document(root: &Value) -> Document {
    let sidebars = match untag(root) {
        Value::Mapping(map) => map.get("sidebars").and_then(as_sequence),
        _ => None,
    };
    let Some(sidebars) = sidebars else {
        tracing::debug!("no `sidebars` sequence at document root");
        return Document::default();
    };

    Document {
        sidebars: sidebars.iter().map(build_sidebar).collect(),
    }
}

fn build_sidebar(value: &Value) -> Sidebar {
    let Value::Mapping(map) = untag(value) else {
        tracing::debug!("skipping non-mapping sidebar entry");
        return Sidebar::default();
    };
    Sidebar {
        label: label_of(map),
        attrs: attributes(map),
        items: map.get("items").and_then(as_sequence).map(|s| classify_all(s)),
    }
}

fn classify_all(values: &[Value]) -> Vec<Node> {
    values.iter().filter_map(classify).collect()
}

/// Classify a single entry. Entries matching no variant yield `None`.
pub fn classify(value: &Value) -> Option<Node> {
    match untag(value) {
        Value::String(text) => Some(Node::Text(text.clone())),
        Value::Mapping(map) => classify_entry(map),
        other => {
            tracing::debug!(?other, "skipping entry with no recognised shape");
            None
        }
    }
}

fn classify_entry(map: &Mapping) -> Option<Node> {
    let Some(label) = label_of(map) else {
        tracing::debug!("skipping mapping entry without a label");
        return None;
    };
    let attrs = attributes(map);

    if let Some(href) = map.get("href").and_then(truthy_text) {
        return Some(Node::Link { label, href, attrs });
    }
    if let Some(items) = map.get("items").and_then(as_sequence) {
        return Some(Node::Category {
            label,
            attrs,
            items: classify_all(items),
        });
    }
    if let Some(headings) = map
        .get("headings")
        .and_then(as_sequence)
        .filter(|h| !h.is_empty())
    {
        return Some(Node::Topic {
            label,
            attrs,
            headings: classify_all(headings),
        });
    }
    Some(Node::Labeled { label, attrs })
}

fn label_of(map: &Mapping) -> Option<String> {
    map.get("label").and_then(truthy_text)
}

/// Collect scalar metadata (in key order) and the tags list.
fn attributes(map: &Mapping) -> Attributes {
    let fields = map
        .iter()
        .filter_map(|(key, value)| {
            let name = key_text(key)?;
            if RESERVED_KEYS.contains(&name.as_str()) {
                return None;
            }
            Some(Field {
                name,
                value: scalar_of(value)?,
            })
        })
        .collect();

    Attributes {
        fields,
        tags: map.get("tags").and_then(string_list),
    }
}

/// Non-empty list of strings; a single non-string element drops the list.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let seq = as_sequence(value)?;
    if seq.is_empty() {
        return None;
    }
    seq.iter()
        .map(|v| match untag(v) {
            Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

fn scalar_of(value: &Value) -> Option<Scalar> {
    match untag(value) {
        Value::String(s) => Some(Scalar::String(s.clone())),
        Value::Number(n) => Some(Scalar::Number(n.clone())),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        _ => None,
    }
}

fn key_text(key: &Value) -> Option<String> {
    scalar_of(key).map(|s| s.to_string())
}

/// Text of a scalar that is also truthy.
fn truthy_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    scalar_of(value).map(|s| s.to_string())
}

fn is_truthy(value: &Value) -> bool {
    match untag(value) {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn as_sequence(value: &Value) -> Option<&Vec<Value>> {
    match untag(value) {
        Value::Sequence(seq) => Some(seq),
        _ => None,
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}
