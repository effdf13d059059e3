//! folio - content pipeline for a portfolio and blog site
//!
//! Turns posts written in an extended markdown dialect (`+++` frontmatter,
//! `![[...]][[...]]` media placeholders, footnotes, fenced code) into an
//! ordered list of render segments for a presentation layer.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod assets;
pub mod content_model;
pub mod html_exporter;
pub mod pipeline;
pub mod posts;
pub mod site_config;

pub use assets::{AssetError, AssetSource, FsAssets, MemoryAssets};
pub use content_model::{ContentWarning, Footnote, Metadata, ParsedDocument, Segment};
pub use pipeline::{expand_placeholders, parse_document, RenderContext};
pub use site_config::{ContentConfig, SiteConfig};
