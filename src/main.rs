//! navdoc — generate Markdown outlines from YAML sidebar definitions.
//!
//! Two modes:
//!
//! - **stdin mode**: `navdoc < sidebars.yaml`
//! - **file mode**: `navdoc -o docs/outline config/*.yaml`

use anyhow::{Context, Result};
use clap::Parser;
use navdoc::render::{self, RenderOptions};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "navdoc",
    about = "Generate Markdown outlines from YAML sidebar definitions"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Source name recorded in the outline header (stdin mode)
    #[arg(long)]
    source: Option<String>,

    /// Skip the final Markdown normalization pass
    #[arg(long)]
    no_normalize: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

fn render_options(cli: &Cli, source: Option<String>) -> RenderOptions {
    let options = RenderOptions::new().with_normalize(!cli.no_normalize);
    match source {
        Some(source) => options.with_source(source),
        None => options,
    }
}

/// stdin mode: read YAML from stdin, write the rendered document to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = navdoc::parse(&input).context("failed to parse stdin")?;
    let renderer = render::create_renderer(&cli.format, render_options(cli, cli.source.clone()))?;
    print!("{}", with_trailing_newline(renderer.render(&doc)));
    Ok(())
}

/// file mode: render each input file into the output directory.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    // Fail on a bad --format before touching any input
    render::create_renderer(&cli.format, RenderOptions::new())?;

    let input_files = expand_globs(&cli.files)?;

    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let doc = match navdoc::parse(&content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unparsable file");
                continue;
            }
        };

        let source = path.to_string_lossy().to_string();
        let renderer = render::create_renderer(&cli.format, render_options(cli, Some(source.clone())))?;
        let name = derive_output_name(&source);
        let out_path = output_dir.join(format!("{}.{}", name, renderer.file_extension()));

        let output = with_trailing_newline(renderer.render(&doc));
        fs::write(&out_path, output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        tracing::info!(from = %source, to = %out_path.display(), "wrote outline");
    }

    Ok(())
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// File extensions recognized as navigation sources.
const SUPPORTED_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "config/sidebars.yaml" → "sidebars"
fn derive_output_name(source: &str) -> String {
    let filename = Path::new(source)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(source);
    filename
        .strip_suffix(".yaml")
        .or_else(|| filename.strip_suffix(".yml"))
        .unwrap_or(filename)
        .to_string()
}
