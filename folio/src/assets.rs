//! Asset lookups used while expanding placeholders
//!
//! The pipeline never touches the filesystem directly. Sketch existence and
//! slideshow folder listings go through an [`AssetSource`], which callers
//! supply: [`FsAssets`] when a public directory is on disk, [`MemoryAssets`]
//! when the answers were resolved ahead of time (e.g. in a browser build).

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that can occur while listing an asset folder
#[derive(Error, Debug)]
pub enum AssetError {
    /// No folder at this public path
    #[error("Folder not found: {0}")]
    NotFound(String),

    /// The folder exists on disk but could not be read
    #[error("Failed to list {path}: {source}", path = .path.display())]
    ListError {
        /// Resolved path on disk
        path: PathBuf,
        /// Underlying directory walk error
        #[source]
        source: walkdir::Error,
    },
}

/// Read-only view of the site's public assets, addressed by public path
/// (`/assets/images/photo.png`)
pub trait AssetSource {
    /// Whether a file or folder exists at the public path
    fn exists(&self, public_path: &str) -> bool;

    /// File names (not paths) directly inside the folder at the public path
    fn list(&self, public_path: &str) -> Result<Vec<String>, AssetError>;
}

/// Assets served from a public directory on disk
#[derive(Debug, Clone)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    /// Create an asset source rooted at the site's public directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a public path onto the filesystem
    ///
    /// `/assets/x.png` and `assets/x.png` both resolve to `<root>/assets/x.png`.
    pub fn resolve(&self, public_path: &str) -> PathBuf {
        let relative = public_path.trim_start_matches('/');
        self.root.join(relative)
    }
}

impl AssetSource for FsAssets {
    fn exists(&self, public_path: &str) -> bool {
        self.resolve(public_path).exists()
    }

    fn list(&self, public_path: &str) -> Result<Vec<String>, AssetError> {
        let dir = self.resolve(public_path);
        if !dir.is_dir() {
            return Err(AssetError::NotFound(public_path.to_string()));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| AssetError::ListError {
                path: dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        log::debug!("Listed {} files in {}", names.len(), dir.display());
        Ok(names)
    }
}

/// Pre-resolved asset answers, for contexts without filesystem access
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: BTreeSet<String>,
    folders: BTreeMap<String, Vec<String>>,
}

impl MemoryAssets {
    /// Create an empty set with no files or folders
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file at a public path
    pub fn with_file(mut self, public_path: impl Into<String>) -> Self {
        self.files.insert(normalize(&public_path.into()));
        self
    }

    /// Register a folder and the file names it contains
    pub fn with_folder<I, S>(mut self, public_path: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.folders.insert(
            normalize(&public_path.into()),
            names.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl AssetSource for MemoryAssets {
    fn exists(&self, public_path: &str) -> bool {
        let key = normalize(public_path);
        self.files.contains(&key) || self.folders.contains_key(&key)
    }

    fn list(&self, public_path: &str) -> Result<Vec<String>, AssetError> {
        self.folders
            .get(&normalize(public_path))
            .cloned()
            .ok_or_else(|| AssetError::NotFound(public_path.to_string()))
    }
}

/// Public paths compare without a leading or trailing slash
fn normalize(public_path: &str) -> String {
    public_path.trim_matches('/').to_string()
}
