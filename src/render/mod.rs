//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::model::AnnotatedDocument;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

/// Trait for rendering an annotated navigation tree into an output format.
pub trait Renderer {
    fn render(&self, doc: &AnnotatedDocument) -> String;
    fn file_extension(&self) -> &str;
}

/// Per-document settings shared by the renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Identifier of the input, echoed in the outline prologue.
    pub source: Option<String>,
    /// Stamp written into the outline prologue.
    pub generated_at: DateTime<Utc>,
    /// Run the normalizer over the assembled outline.
    pub normalize: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self {
            source: None,
            generated_at: Utc::now(),
            normalize: true,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: RenderOptions) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer::new(options))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}
