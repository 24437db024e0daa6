//! Markdown outline renderer.
//!
//! Each sidebar becomes a `##` section: its comment annotations as
//! paragraphs, its own metadata, then its items as a nested bullet list
//! indented two spaces per level. The assembled text is trimmed and handed to
//! a [`Normalizer`]; if that fails the trimmed text is used as is.

use crate::model::*;
use crate::normalize::{
    normalize, FormatOptions, MarkdownNormalizer, Normalized, Normalizer, Passthrough,
};
use crate::render::{RenderOptions, Renderer};
use chrono::SecondsFormat;

pub struct MarkdownRenderer {
    options: RenderOptions,
    format: FormatOptions,
    normalizer: Box<dyn Normalizer>,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        let normalizer: Box<dyn Normalizer> = if options.normalize {
            Box::new(MarkdownNormalizer)
        } else {
            Box::new(Passthrough)
        };
        Self {
            options,
            format: FormatOptions::outline(),
            normalizer,
        }
    }

    /// Swap in a different formatter for the final pass.
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Render and report whether normalization succeeded.
    pub fn render_outline(&self, doc: &AnnotatedDocument) -> Normalized {
        let mut markdown = prologue(&self.options);
        markdown.push_str(&render_body(doc));
        normalize(
            self.normalizer.as_ref(),
            markdown.trim().to_string(),
            &self.format,
        )
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &AnnotatedDocument) -> String {
        self.render_outline(doc).into_text()
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// HTML comments naming the source (if known) and the generation time.
fn prologue(options: &RenderOptions) -> String {
    let mut out = String::new();
    if let Some(ref source) = options.source {
        out.push_str(&format!("<!-- Source YAML: {} -->\n", source));
    }
    out.push_str(&format!(
        "<!-- Generated: {} -->\n\n",
        options
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out
}

/// Render every sidebar, without prologue or normalization.
pub fn render_body(doc: &AnnotatedDocument) -> String {
    let mut out = String::new();

    for (index, sidebar) in doc.document.sidebars.iter().enumerate() {
        if let Some(ref label) = sidebar.label {
            out.push_str(&format!("## {}\n\n", label));
        }

        if let Some(lines) = doc.annotations.get(index) {
            for line in lines {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str(line);
                    out.push_str("\n\n");
                }
            }
        }

        out.push_str(&render_attributes(&sidebar.attrs, ""));
        if let Some(ref items) = sidebar.items {
            out.push_str(&render_items(items, 0));
        }
        out.push('\n');
    }

    out
}

/// Render a sequence of nodes as a bullet list at `level`.
///
/// Children of a category sit one level down. Headings of a topic sit two
/// levels down, under their own `_headings_` bullet.
pub fn render_items(items: &[Node], level: usize) -> String {
    let indent = "  ".repeat(level);
    let nested = format!("{}  ", indent);
    let mut out = String::new();

    for node in items {
        match node {
            Node::Text(text) => {
                out.push_str(&format!("{}- {}\n", indent, text));
            }
            Node::Link { label, href, attrs } => {
                out.push_str(&format!("{}- [{}]({})\n", indent, label, href));
                out.push_str(&render_attributes(attrs, &nested));
            }
            Node::Category {
                label,
                attrs,
                items,
            } => {
                out.push_str(&format!("{}- {}\n", indent, label));
                out.push_str(&render_attributes(attrs, &nested));
                out.push_str(&render_items(items, level + 1));
            }
            Node::Topic {
                label,
                attrs,
                headings,
            } => {
                out.push_str(&format!("{}- {}\n", indent, label));
                out.push_str(&render_attributes(attrs, &nested));
                out.push_str(&format!("{}- _headings_:\n", nested));
                out.push_str(&render_items(headings, level + 2));
            }
            Node::Labeled { label, attrs } => {
                out.push_str(&format!("{}- {}\n", indent, label));
                out.push_str(&render_attributes(attrs, &nested));
            }
        }
    }

    out
}

/// Scalar fields as `- _name_: value`, then tags as a sub-list.
fn render_attributes(attrs: &Attributes, indent: &str) -> String {
    let mut out = String::new();
    for field in &attrs.fields {
        out.push_str(&format!("{}- _{}_: {}\n", indent, field.name, field.value));
    }
    if let Some(ref tags) = attrs.tags {
        out.push_str(&format!("{}- _tags_:\n", indent));
        for tag in tags {
            out.push_str(&format!("{}  - {}\n", indent, tag));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizeError;
    use crate::parser;
    use chrono::{TimeZone, Utc};

    struct AlwaysFails;

    impl Normalizer for AlwaysFails {
        fn format(&self, _: &str, _: &FormatOptions) -> Result<String, NormalizeError> {
            Err(NormalizeError::Other("formatter unavailable".into()))
        }
    }

    fn fixed_options() -> RenderOptions {
        RenderOptions::new().with_generated_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    fn body(yaml: &str) -> String {
        render_body(&parser::parse(yaml).unwrap())
    }

    fn items(yaml: &str) -> String {
        let doc = parser::parse(&format!("sidebars:\n  - items:\n{}", yaml)).unwrap();
        render_items(doc.document.sidebars[0].items.as_ref().unwrap(), 0)
    }

    #[test]
    fn heading_then_link_list() {
        let out = body("sidebars:\n  - label: Guides\n    items:\n      - label: Intro\n        href: /intro\n");
        assert_eq!(out, "## Guides\n\n- [Intro](/intro)\n  - _href_: /intro\n\n");
    }

    #[test]
    fn tags_render_as_sub_list() {
        let out = items("      - label: Tagged\n        tags: [a, b]\n");
        assert_eq!(out, "- Tagged\n  - _tags_:\n    - a\n    - b\n");
    }

    #[test]
    fn category_nests_one_level() {
        let out = items(
            "      - label: Outer\n        collapsed: true\n        items:\n          - plain\n          - label: Inner\n            items: []\n",
        );
        assert_eq!(
            out,
            "- Outer\n  - _collapsed_: true\n  - plain\n  - Inner\n"
        );
    }

    #[test]
    fn topic_headings_nest_two_levels() {
        let out = items(
            "      - label: Topic\n        order: 2\n        headings:\n          - First\n          - label: Second\n            href: '#second'\n",
        );
        assert_eq!(
            out,
            "- Topic\n  - _order_: 2\n  - _headings_:\n    - First\n    - [Second](#second)\n      - _href_: #second\n"
        );
    }

    #[test]
    fn unmatched_entries_contribute_nothing() {
        let out = items("      - 42\n      - {href: /nowhere}\n      - kept\n");
        assert_eq!(out, "- kept\n");
    }

    #[test]
    fn annotations_become_paragraphs() {
        let out = body("sidebars:\n  # First\n  #\n  # Second\n  - label: Docs\n    version: 3\n");
        assert_eq!(out, "## Docs\n\nFirst\n\n\nSecond\n\n- _version_: 3\n\n");
    }

    #[test]
    fn sidebar_without_label_skips_heading() {
        let out = body("sidebars:\n  - items:\n      - only\n");
        assert_eq!(out, "- only\n\n");
    }

    #[test]
    fn prologue_with_and_without_source() {
        let options = fixed_options();
        assert_eq!(
            prologue(&options),
            "<!-- Generated: 2024-05-01T12:00:00.000Z -->\n\n"
        );
        assert_eq!(
            prologue(&options.with_source("docs/sidebars.yaml")),
            "<!-- Source YAML: docs/sidebars.yaml -->\n<!-- Generated: 2024-05-01T12:00:00.000Z -->\n\n"
        );
    }

    #[test]
    fn full_render_is_normalized() {
        let doc = parser::parse("sidebars:\n  - label: Guides\n    items:\n      - Intro\n").unwrap();
        let outline = MarkdownRenderer::new(fixed_options()).render_outline(&doc);
        assert!(!outline.is_fallback());
        assert_eq!(
            outline.text(),
            "<!-- Generated: 2024-05-01T12:00:00.000Z -->\n\n## Guides\n\n- Intro\n"
        );
    }

    #[test]
    fn failing_normalizer_returns_trimmed_text() {
        let doc = parser::parse("sidebars:\n  - label: Guides\n    items:\n      - Intro\n").unwrap();
        let outline = MarkdownRenderer::new(fixed_options())
            .with_normalizer(AlwaysFails)
            .render_outline(&doc);
        assert!(outline.is_fallback());
        assert_eq!(
            outline.into_text(),
            "<!-- Generated: 2024-05-01T12:00:00.000Z -->\n\n## Guides\n\n- Intro"
        );
    }

    #[test]
    fn normalize_can_be_disabled() {
        let doc = parser::parse("sidebars:\n  # a\n  #\n  #\n  - label: X\n").unwrap();
        let text = MarkdownRenderer::new(fixed_options().with_normalize(false)).render(&doc);
        assert_eq!(text, "<!-- Generated: 2024-05-01T12:00:00.000Z -->\n\n## X\n\na");
    }
}
