//! JSON renderer — structured output for tooling integration.
//!
//! Dumps the classified tree with its annotations, so the variant each entry
//! resolved to can be inspected without reading the outline.

use crate::model::*;
use crate::render::Renderer;
use serde_json::{json, Value};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &AnnotatedDocument) -> String {
        let sidebars: Vec<Value> = doc
            .document
            .sidebars
            .iter()
            .enumerate()
            .map(|(index, sidebar)| sidebar_json(sidebar, doc.annotations.get(index)))
            .collect();

        let mut out = serde_json::to_string_pretty(&json!({ "sidebars": sidebars }))
            .unwrap_or_else(|_| "{}".to_string());
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn sidebar_json(sidebar: &Sidebar, annotations: Option<&[String]>) -> Value {
    let mut obj = json!({
        "label": sidebar.label,
        "metadata": fields_json(&sidebar.attrs),
        "tags": sidebar.attrs.tags,
    });
    if let Some(lines) = annotations {
        obj["annotations"] = json!(lines);
    }
    if let Some(ref items) = sidebar.items {
        obj["items"] = nodes_json(items);
    }
    obj
}

fn nodes_json(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(node_json).collect())
}

fn node_json(node: &Node) -> Value {
    let mut obj = match node {
        Node::Text(text) => return json!({ "kind": node.kind(), "text": text }),
        Node::Link { label, href, .. } => json!({ "label": label, "href": href }),
        Node::Category { label, items, .. } => json!({ "label": label, "items": nodes_json(items) }),
        Node::Topic {
            label, headings, ..
        } => json!({ "label": label, "headings": nodes_json(headings) }),
        Node::Labeled { label, .. } => json!({ "label": label }),
    };
    obj["kind"] = json!(node.kind());
    if let Some(attrs) = attributes_of(node) {
        obj["metadata"] = fields_json(attrs);
        obj["tags"] = json!(attrs.tags);
    }
    obj
}

fn attributes_of(node: &Node) -> Option<&Attributes> {
    match node {
        Node::Text(_) => None,
        Node::Link { attrs, .. }
        | Node::Category { attrs, .. }
        | Node::Topic { attrs, .. }
        | Node::Labeled { attrs, .. } => Some(attrs),
    }
}

/// Fields as an ordered list of `{name, value}` pairs.
fn fields_json(attrs: &Attributes) -> Value {
    attrs
        .fields
        .iter()
        .map(|f| json!({ "name": f.name, "value": scalar_json(&f.value) }))
        .collect()
}

fn scalar_json(value: &Scalar) -> Value {
    match value {
        Scalar::String(s) => json!(s),
        Scalar::Bool(b) => json!(b),
        Scalar::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!(i)
            } else if let Some(u) = n.as_u64() {
                json!(u)
            } else {
                n.as_f64().map_or(Value::Null, |f| json!(f))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn render(yaml: &str) -> Value {
        let doc = parser::parse(yaml).unwrap();
        serde_json::from_str(&JsonRenderer.render(&doc)).unwrap()
    }

    #[test]
    fn reports_variant_kinds() {
        let value = render(
            "\
sidebars:
  # Start here
  - label: Guides
    items:
      - text
      - {label: Link, href: /x, weight: 1.5}
      - {label: Cat, items: []}
      - {label: Top, headings: [h]}
      - {label: Bare, tags: [t]}
",
        );
        let sidebar = &value["sidebars"][0];
        assert_eq!(sidebar["annotations"], json!(["Start here"]));
        let kinds: Vec<&str> = sidebar["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["text", "link", "category", "topic", "labeled"]);
        assert_eq!(
            sidebar["items"][1]["metadata"],
            json!([{"name": "href", "value": "/x"}, {"name": "weight", "value": 1.5}])
        );
        assert_eq!(sidebar["items"][4]["tags"], json!(["t"]));
    }

    #[test]
    fn unannotated_sidebar_has_no_annotations_key() {
        let value = render("sidebars:\n  - label: A\n");
        assert!(value["sidebars"][0].get("annotations").is_none());
        assert!(value["sidebars"][0].get("items").is_none());
    }
}
