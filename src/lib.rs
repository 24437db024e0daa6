//! navdoc — render YAML sidebar navigation trees as Markdown outlines.
//!
//! Pipeline: source text → [`parser::parse`] (classified tree + comment
//! annotations) → [`render::Renderer`] → normalized output text.

pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;

pub use model::AnnotatedDocument;
pub use parser::{parse, ParseError};
pub use render::{create_renderer, RenderOptions, Renderer};

use render::markdown::MarkdownRenderer;

/// Parse `source` and render it as a Markdown outline.
///
/// Normalization problems never fail this call; only YAML that cannot be
/// parsed at all does.
pub fn convert(source: &str, options: RenderOptions) -> Result<String, ParseError> {
    let doc = parser::parse(source)?;
    Ok(MarkdownRenderer::new(options).render(&doc))
}
