//! Parser module — YAML tree plus the comment side-table.

pub mod comments;
pub mod yaml;

use crate::model::AnnotatedDocument;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse navigation source into a classified tree with sidebar annotations.
///
/// Annotation recovery is best effort: if the comment scan cannot be lined
/// up with the parsed `sidebars` sequence, the tree is returned without
/// annotations. Only invalid YAML is an error.
pub fn parse(source: &str) -> Result<AnnotatedDocument, ParseError> {
    let document = yaml::parse(source)?;

    let annotations = comments::extract(source, document.sidebars.len());

    Ok(AnnotatedDocument {
        document,
        annotations,
    })
}
