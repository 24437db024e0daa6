//! Leading-comment recovery for top-level `sidebars` entries.
//!
//! YAML deserialisers throw comments away, so this module scans the raw
//! source line by line (the same way the bash annotation parser in shdoc
//! walks `#` lines) to find the comment block sitting right above each
//! `- ` entry of the top-level `sidebars` sequence.
//!
//! Only top-level entries are considered. Comments on nested items are
//! never attached anywhere.

use crate::model::Annotations;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_SIDEBARS_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:sidebars|"sidebars"|'sidebars')[[:blank:]]*:[[:blank:]]*(?:#.*)?$"#).unwrap()
});

static RE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *-(?:[[:blank:]]|$)").unwrap());

static RE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:blank:]]*#(.*)$").unwrap());

// `key: |`, `key: >-`, `- |2` ... opens an indented block scalar
static RE_BLOCK_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^[[:blank:]]*-|:)[[:blank:]]+[|>][1-9+-]*[[:blank:]]*(?:#.*)?$").unwrap()
});

// `key: "...` or `- '...` starts a flow scalar that may span lines
static RE_QUOTE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^[[:blank:]]*-[[:blank:]]+|:[[:blank:]]+)(["'])"#).unwrap()
});

// -- Public API ---------------------------------------------------------------

/// Build the annotation side-table for `source`, whose top-level `sidebars`
/// sequence parsed to `sidebars` entries.
///
/// For each entry that has a leading comment block, the block is collected,
/// then the blocks of immediately preceding siblings are prepended one by
/// one until a sibling without a leading block is reached. Lines are split
/// on newlines and trimmed.
///
/// Returns an empty table when the sequence cannot be located, or when the
/// entries found by the scan do not line up with the parsed ones.
pub fn extract(source: &str, sidebars: usize) -> Annotations {
    match scan(source) {
        Some(entries) if entries.len() == sidebars => annotate(&entries),
        Some(entries) => {
            tracing::debug!(
                scanned = entries.len(),
                parsed = sidebars,
                "sidebar entry count mismatch; dropping annotations"
            );
            Annotations::default()
        }
        None => {
            tracing::debug!("no block `sidebars` sequence found; skipping annotations");
            Annotations::default()
        }
    }
}

/// Run the backward sibling walk over already scanned leading comments.
fn annotate(entries: &[Option<String>]) -> Annotations {
    let mut annotations = Annotations::default();
    for index in 0..entries.len() {
        let mut lines: Vec<String> = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let Some(comment) = &entries[i] else {
                break;
            };
            let mut block: Vec<String> =
                comment.split('\n').map(|l| l.trim().to_string()).collect();
            block.append(&mut lines);
            lines = block;
            cursor = i.checked_sub(1);
        }
        annotations.insert(index, lines);
    }
    annotations
}

/// Leading comment text for every entry of the top-level `sidebars` block
/// sequence, in source order.
///
/// Each element is `None` when the entry has no comment directly above it,
/// otherwise the comment lines (without `#`) joined by `\n`. Blank lines
/// inside a block are kept as empty lines. Returns `None` when there is no
/// top-level `sidebars:` key followed by a block sequence.
fn scan(source: &str) -> Option<Vec<Option<String>>> {
    let lines: Vec<&str> = source.lines().collect();
    let start = lines.iter().position(|l| RE_SIDEBARS_KEY.is_match(l))?;

    let mut entries: Vec<Option<String>> = Vec::new();
    // Comment lines (or blanks, as `None`) seen since the last content line
    let mut pending: Vec<Option<&str>> = Vec::new();
    let mut seq_indent: Option<usize> = None;
    // Indentation of the line that opened the current block scalar
    let mut block_parent: Option<usize> = None;
    // Quote of a flow scalar still open at the end of the previous line
    let mut open_quote: Option<char> = None;

    for line in &lines[start + 1..] {
        if let Some(quote) = open_quote {
            if closes(line, quote) {
                open_quote = None;
            }
            pending.clear();
            continue;
        }

        let indent = indent_of(line);
        let blank = line.trim().is_empty();

        if let Some(parent) = block_parent {
            if blank || indent > parent {
                pending.clear();
                continue;
            }
            block_parent = None;
        }

        if blank {
            pending.push(None);
            continue;
        }
        if let Some(caps) = RE_COMMENT.captures(line) {
            pending.push(Some(caps.get(1).map_or("", |m| m.as_str())));
            continue;
        }
        if is_document_marker(line) {
            break;
        }

        let is_entry = RE_ENTRY.is_match(line);
        match seq_indent {
            None if is_entry => {
                seq_indent = Some(indent);
                entries.push(take_block(&mut pending));
            }
            None => return None,
            Some(seq) if indent < seq || (indent == seq && !is_entry) => break,
            Some(seq) if indent == seq => entries.push(take_block(&mut pending)),
            Some(_) => pending.clear(),
        }

        if RE_BLOCK_SCALAR.is_match(line) {
            block_parent = Some(indent);
        }
        open_quote = unclosed_quote(line);
    }

    seq_indent.map(|_| entries)
}

// -- Helpers ------------------------------------------------------------------

/// Drain the pending gap into a comment block, dropping blank edges.
fn take_block(pending: &mut Vec<Option<&str>>) -> Option<String> {
    let first = pending.iter().position(Option::is_some);
    let last = pending.iter().rposition(Option::is_some);
    let block = match (first, last) {
        (Some(first), Some(last)) => Some(
            pending[first..=last]
                .iter()
                .map(|l| l.unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    };
    pending.clear();
    block
}

/// Quote character of a flow scalar that starts on `line` but does not end there.
fn unclosed_quote(line: &str) -> Option<char> {
    let caps = RE_QUOTE_OPEN.captures(line)?;
    let quote = caps.get(1)?;
    let q = quote.as_str().chars().next()?;
    if closes(&line[quote.end()..], q) {
        None
    } else {
        Some(q)
    }
}

/// Whether `text` holds the closing `quote` of an open scalar.
/// `\` escapes inside double quotes, `''` is a literal quote inside single ones.
fn closes(text: &str, quote: char) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && quote == '"' {
            chars.next();
        } else if c == quote {
            if quote == '\'' && chars.peek() == Some(&'\'') {
                chars.next();
            } else {
                return true;
            }
        }
    }
    false
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_document_marker(line: &str) -> bool {
    line == "---" || line.starts_with("--- ") || line == "..."
}
