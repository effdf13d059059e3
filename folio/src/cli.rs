//! Command-line interface definitions for folio

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the render command
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Segments, footnotes, headings and warnings as JSON
    #[default]
    Json,
    /// Standalone HTML preview page
    Html,
}

/// CLI structure for the folio application
#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content pipeline for a portfolio and blog site", long_about = None)]
pub struct Cli {
    /// Site configuration file
    #[arg(short, long, global = true, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Public directory to resolve assets against (overrides the config)
    #[arg(long, global = true, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for folio
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a post and print or write its segments
    Render {
        /// Post file (.md or .mdx)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a post with every placeholder expanded to its tag form
    Expand {
        /// Post file (.md or .mdx)
        file: PathBuf,
    },

    /// Report missing assets and other content warnings
    Validate {
        /// Post files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List published posts, newest first
    Posts {
        /// Posts directory (defaults to posts_dir from the config)
        dir: Option<PathBuf>,
    },
}
