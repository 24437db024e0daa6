//! Data model for parsed navigation trees — format-agnostic.
//!
//! Every entry is classified exactly once, at parse time, into a [`Node`]
//! variant. Renderers only ever match on variants; they never look at raw
//! YAML keys.

use std::collections::BTreeMap;
use std::fmt;

/// Keys that are structural and therefore never rendered as metadata.
pub const RESERVED_KEYS: &[&str] = &["label", "items", "headings", "tags"];

/// Parsed navigation document plus the comment side-table.
#[derive(Debug, Default)]
pub struct AnnotatedDocument {
    pub document: Document,
    pub annotations: Annotations,
}

/// The root of a navigation file.
#[derive(Debug, Default)]
pub struct Document {
    /// One entry per element of the `sidebars` sequence, in source order.
    pub sidebars: Vec<Sidebar>,
}

/// A top-level navigation group.
#[derive(Debug, Default)]
pub struct Sidebar {
    pub label: Option<String>,
    pub attrs: Attributes,
    /// `None` when the entry has no `items` sequence at all.
    pub items: Option<Vec<Node>>,
}

/// A classified entry in a navigation tree.
///
/// Variant order mirrors classification precedence: an entry that fits
/// several shapes is always the earliest one listed here.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A bare string entry.
    Text(String),
    /// `label` + `href`.
    Link {
        label: String,
        href: String,
        attrs: Attributes,
    },
    /// `label` + an `items` sequence (possibly empty).
    Category {
        label: String,
        attrs: Attributes,
        items: Vec<Node>,
    },
    /// `label` + a non-empty `headings` sequence.
    Topic {
        label: String,
        attrs: Attributes,
        headings: Vec<Node>,
    },
    /// `label` only.
    Labeled { label: String, attrs: Attributes },
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Link { .. } => "link",
            Node::Category { .. } => "category",
            Node::Topic { .. } => "topic",
            Node::Labeled { .. } => "labeled",
        }
    }
}

/// Scalar metadata and tags carried by an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    /// Scalar fields in the entry's own key order.
    pub fields: Vec<Field>,
    /// Present only for a non-empty list made entirely of strings.
    pub tags: Option<Vec<String>>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.tags.is_none()
    }
}

/// One `name: value` metadata pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(serde_yaml::Number),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() => write_float(f, x),
                _ => write!(f, "{}", n),
            },
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Floats print like JavaScript numbers: whole values without a fraction,
/// `NaN` and `Infinity` spelled out.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("NaN")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" })
    } else if x == 0.0 {
        f.write_str("0")
    } else {
        write!(f, "{}", x)
    }
}

/// Comment lines recovered from the source, keyed by sidebar index.
///
/// Kept beside the tree instead of inside it so parsed data stays immutable.
/// An index with no preceding comments has no entry (never an empty list).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Annotations {
    by_sidebar: BTreeMap<usize, Vec<String>>,
}

impl Annotations {
    pub fn insert(&mut self, index: usize, lines: Vec<String>) {
        if !lines.is_empty() {
            self.by_sidebar.insert(index, lines);
        }
    }

    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.by_sidebar.get(&index).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_sidebar.is_empty()
    }
}
