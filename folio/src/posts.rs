//! Blog post discovery
//!
//! Posts are `.md` / `.mdx` files directly inside the posts directory. The
//! file stem is the slug. Drafts and archived posts are left out of the
//! index, and the rest are ordered newest first.

use crate::content_model::Metadata;
use crate::pipeline::frontmatter;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Statuses that keep a post out of the index
const HIDDEN_STATUSES: [&str; 2] = ["draft", "archive"];

/// Errors that can occur while discovering posts
#[derive(Error, Debug)]
pub enum PostsError {
    /// The posts directory does not exist
    #[error("Posts directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Directory walk failed
    #[error("Failed to scan posts directory: {0}")]
    WalkError(#[from] walkdir::Error),

    /// A post file could not be read
    #[error("Failed to read post {path}: {source}", path = .path.display())]
    ReadError {
        /// Post file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file stem cannot be used as a slug
    #[error("Post filename is not valid UTF-8: {0}")]
    InvalidFilename(PathBuf),
}

/// One post in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    /// File stem, used in the post URL
    pub slug: String,
    /// Path of the source file
    pub path: PathBuf,
    /// Frontmatter metadata
    pub metadata: Metadata,
    /// Body after the frontmatter block
    pub content: String,
}

impl PostSummary {
    /// Whether the post shows up in the index (`status` other than draft/archive)
    pub fn is_listed(&self) -> bool {
        let status = self.metadata.status();
        !HIDDEN_STATUSES.iter().any(|hidden| *hidden == status)
    }
}

/// Load every listed post in a directory, newest first
///
/// # Parameters
/// * `dir` - Directory containing `.md` / `.mdx` post files
///
/// # Returns
/// * `Ok(Vec<PostSummary>)` - Listed posts sorted by date descending, undated posts last
/// * `Err(PostsError)` - Missing directory or unreadable post file
pub fn load_posts(dir: &Path) -> Result<Vec<PostSummary>, PostsError> {
    if !dir.is_dir() {
        return Err(PostsError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_post_file(entry.path()) {
            paths.push(entry.path().to_path_buf());
        }
    }

    #[cfg(feature = "parallel")]
    let posts: Result<Vec<_>, _> = paths.par_iter().map(|path| read_post(path)).collect();

    #[cfg(not(feature = "parallel"))]
    let posts: Result<Vec<_>, _> = paths.iter().map(|path| read_post(path)).collect();

    let total = paths.len();
    let mut posts: Vec<PostSummary> = posts?.into_iter().filter(PostSummary::is_listed).collect();
    posts.sort_by(newest_first);

    log::info!(
        "Found {} posts in {} ({} hidden)",
        posts.len(),
        dir.display(),
        total - posts.len()
    );
    Ok(posts)
}

/// Read a single post file
pub fn read_post(path: &Path) -> Result<PostSummary, PostsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PostsError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PostsError::InvalidFilename(path.to_path_buf()))?
        .to_string();

    let (metadata, body) = frontmatter::extract(&raw);
    log::debug!("Read post {} ({} metadata keys)", slug, metadata.len());

    Ok(PostSummary {
        slug,
        path: path.to_path_buf(),
        metadata,
        content: body.to_string(),
    })
}

fn is_post_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("md") | Some("mdx")
    )
}

/// ISO dates compare lexically; posts without a date sort last
fn newest_first(a: &PostSummary, b: &PostSummary) -> Ordering {
    match (a.metadata.date(), b.metadata.date()) {
        (Some(da), Some(db)) => db.cmp(da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.slug.cmp(&b.slug))
}
