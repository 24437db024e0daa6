//! Output normalization — the last step of the outline pipeline.
//!
//! Rendering never fails because of the formatter: [`normalize`] turns a
//! formatter error into [`Normalized::Fallback`] carrying the untouched
//! text, and logs the reason.

use comrak::{format_commonmark, parse_document, Arena, ComrakOptions};
use std::string::FromUtf8Error;
use thiserror::Error;

// -- Options ------------------------------------------------------------------

/// Document grammar the formatter should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Markdown,
}

/// Optional constructs recognised on top of the base grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// Fenced code blocks. Part of CommonMark itself, so always recognised.
    EmbeddedCode,
    /// A leading `---` block, kept verbatim.
    FrontMatter,
    /// GitHub-style pipe tables.
    Tables,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub syntax: Syntax,
    pub extensions: Vec<Extension>,
}

impl FormatOptions {
    /// Markdown with every extension enabled; what outlines are formatted with.
    pub fn outline() -> Self {
        Self {
            syntax: Syntax::Markdown,
            extensions: vec![
                Extension::EmbeddedCode,
                Extension::FrontMatter,
                Extension::Tables,
            ],
        }
    }

    pub fn has(&self, extension: Extension) -> bool {
        self.extensions.contains(&extension)
    }
}

// -- Seam ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("markdown serialization failed: {0}")]
    Serialize(String),
    #[error("formatter produced invalid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("{0}")]
    Other(String),
}

/// A text formatter that may reject malformed input.
pub trait Normalizer {
    fn format(&self, text: &str, options: &FormatOptions) -> Result<String, NormalizeError>;
}

/// Outcome of a best-effort normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Formatted(String),
    Fallback {
        text: String,
        reason: NormalizeError,
    },
}

impl Normalized {
    pub fn text(&self) -> &str {
        match self {
            Normalized::Formatted(text) | Normalized::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Normalized::Formatted(text) | Normalized::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback { .. })
    }
}

/// Format `text`, falling back to it unchanged if the formatter fails.
pub fn normalize(normalizer: &dyn Normalizer, text: String, options: &FormatOptions) -> Normalized {
    match normalizer.format(&text, options) {
        Ok(formatted) => Normalized::Formatted(formatted),
        Err(reason) => {
            tracing::warn!(%reason, "normalization failed; emitting unformatted text");
            Normalized::Fallback { text, reason }
        }
    }
}

/// Returns its input unchanged.
pub struct Passthrough;

impl Normalizer for Passthrough {
    fn format(&self, text: &str, _options: &FormatOptions) -> Result<String, NormalizeError> {
        Ok(text.to_string())
    }
}

// -- Markdown normalizer ------------------------------------------------------

/// Built-in Markdown normalizer.
///
/// Parses the text with comrak and writes it back as CommonMark: `-` bullets
/// indented two spaces per level, ATX headings, one blank line between
/// blocks and a single trailing newline. Emphasis comes out as `*text*` and
/// consecutive HTML comment lines become separate blocks.
pub struct MarkdownNormalizer;

impl Normalizer for MarkdownNormalizer {
    fn format(&self, text: &str, options: &FormatOptions) -> Result<String, NormalizeError> {
        let comrak_options = comrak_options(options);
        let arena = Arena::new();
        let root = parse_document(&arena, text, &comrak_options);

        let mut output = Vec::new();
        format_commonmark(root, &comrak_options, &mut output)
            .map_err(|e| NormalizeError::Serialize(e.to_string()))?;
        Ok(String::from_utf8(output)?)
    }
}

fn comrak_options(options: &FormatOptions) -> ComrakOptions<'static> {
    let Syntax::Markdown = options.syntax;
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = options.has(Extension::Tables);
    if options.has(Extension::FrontMatter) {
        comrak.extension.front_matter_delimiter = Some("---".into());
    }
    // Keep the HTML comment prologue
    comrak.render.unsafe_ = true;
    comrak
}
