//! folio - content pipeline for a portfolio and blog site
//!
//! A CLI tool for rendering, expanding, validating and listing blog posts
//! written with frontmatter, media placeholders and footnotes.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use folio::content_model::{ContentWarning, Footnote, Heading, Metadata, ParsedDocument, Segment};
use folio::pipeline::frontmatter;
use folio::{html_exporter, posts, FsAssets, RenderContext, SiteConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Main entry point for the folio CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging if verbose
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let mut config = SiteConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(public_dir) = cli.public_dir {
        config.public_dir = public_dir;
    }

    match cli.command {
        Commands::Render {
            file,
            format,
            output,
        } => {
            handle_render_command(&config, &file, format, output)?;
        }

        Commands::Expand { file } => {
            handle_expand_command(&config, &file)?;
        }

        Commands::Validate { files } => {
            handle_validate_command(&config, &files)?;
        }

        Commands::Posts { dir } => {
            let dir = dir.unwrap_or_else(|| config.posts_dir.clone());
            handle_posts_command(&dir)?;
        }
    }

    Ok(())
}

/// JSON shape printed by `folio render`
#[derive(Serialize)]
struct RenderOutput<'a> {
    metadata: &'a Metadata,
    segments: &'a [Segment],
    footnotes: &'a [Footnote],
    headings: Vec<Heading>,
    warnings: &'a [ContentWarning],
}

fn read_document(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn parse_file(config: &SiteConfig, file: &Path) -> Result<ParsedDocument> {
    let raw = read_document(file)?;
    let assets = FsAssets::new(&config.public_dir);
    let ctx = RenderContext::new(&assets, &config.content);
    let doc = folio::parse_document(&raw, &ctx);

    log::info!(
        "{}: {} segments ({} widgets), {} footnotes",
        file.display(),
        doc.segments.len(),
        doc.widget_count(),
        doc.footnotes.len()
    );
    Ok(doc)
}

/// Handle the render command
fn handle_render_command(
    config: &SiteConfig,
    file: &Path,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let doc = parse_file(config, file)?;

    match format {
        OutputFormat::Json => {
            let rendered = RenderOutput {
                metadata: &doc.metadata,
                segments: &doc.segments,
                footnotes: &doc.footnotes,
                headings: doc.headings(),
                warnings: &doc.warnings,
            };
            let json = serde_json::to_string_pretty(&rendered)
                .with_context(|| format!("Failed to serialize {}", file.display()))?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("✓ Successfully wrote: {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        OutputFormat::Html => match output {
            Some(path) => {
                html_exporter::to_html(&doc, &path)
                    .with_context(|| format!("Failed to export HTML to {}", path.display()))?;
                println!("✓ Successfully wrote: {}", path.display());
            }
            None => print!("{}", html_exporter::render_page(&doc)),
        },
    }

    Ok(())
}

/// Handle the expand command
fn handle_expand_command(config: &SiteConfig, file: &Path) -> Result<()> {
    let raw = read_document(file)?;
    let (metadata, body) = frontmatter::extract(&raw);

    let assets = FsAssets::new(&config.public_dir);
    let ctx = RenderContext::new(&assets, &config.content);
    let expanded = folio::expand_placeholders(body, &ctx);

    if !metadata.is_empty() {
        print!("{}", metadata.to_frontmatter());
    }
    print!("{}", expanded.body);

    for warning in &expanded.warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

/// Handle the validate command
fn handle_validate_command(config: &SiteConfig, files: &[PathBuf]) -> Result<()> {
    println!("Validating {} file(s)...", files.len());

    let mut total = 0;
    for file in files {
        let doc = parse_file(config, file)?;
        if doc.warnings.is_empty() {
            println!("✓ {}", file.display());
            continue;
        }

        for warning in &doc.warnings {
            println!(
                "✗ {}: [{:?}] {}",
                file.display(),
                warning.severity(),
                warning
            );
        }
        total += doc.warnings.len();
    }

    if total > 0 {
        anyhow::bail!("{} content warning(s) found", total);
    }

    println!("\n✓ All content is valid");
    Ok(())
}

/// Handle the posts command
fn handle_posts_command(dir: &Path) -> Result<()> {
    let posts = posts::load_posts(dir)
        .with_context(|| format!("Failed to load posts from {}", dir.display()))?;

    for post in &posts {
        println!(
            "{:<10}  {:<32}  {}",
            post.metadata.date().unwrap_or("-"),
            post.slug,
            post.metadata.title().unwrap_or("")
        );
    }
    println!("\n{} published post(s)", posts.len());

    Ok(())
}
