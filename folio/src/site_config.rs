//! Site configuration from folio.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main site configuration from folio.toml
///
/// Every field has a default, so an absent file and an empty file behave
/// the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory served as the site root; public paths resolve against it
    pub public_dir: PathBuf,

    /// Directory holding blog posts (`.md` / `.mdx`)
    pub posts_dir: PathBuf,

    /// Placeholder expansion settings
    pub content: ContentConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            posts_dir: PathBuf::from("public/assets/blog"),
            content: ContentConfig::default(),
        }
    }
}

/// Settings used while expanding placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Public base directory for relative image paths
    pub image_dir: String,

    /// Public base directory for relative video paths
    pub video_dir: String,

    /// Public base directory for relative PDF paths
    pub pdf_dir: String,

    /// Public directory holding p5.js sketch scripts
    pub sketch_dir: String,

    /// CSS classes applied to every widget segment
    pub style_class: String,

    /// Sketch container width when the placeholder gives none
    pub sketch_width: u32,

    /// Sketch container height when the placeholder gives none
    pub sketch_height: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            image_dir: "/assets/images".to_string(),
            video_dir: "/assets/video".to_string(),
            pdf_dir: "/assets/pdf".to_string(),
            sketch_dir: "/assets/sketches".to_string(),
            style_class: "border rounded-lg shadow-lg my-8".to_string(),
            sketch_width: 800,
            sketch_height: 600,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a folio.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the folio.toml configuration file
    ///
    /// # Returns
    /// * `Ok(SiteConfig)` - Successfully loaded configuration
    /// * `Err(SiteConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SiteConfigError> {
        let content = fs::read_to_string(&path).map_err(SiteConfigError::IoError)?;

        let config: SiteConfig = toml::from_str(&content).map_err(SiteConfigError::ParseError)?;

        Ok(config)
    }

    /// Load configuration if the file exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, SiteConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::info!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Save configuration to a folio.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the folio.toml file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(SiteConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SiteConfigError> {
        let content = toml::to_string_pretty(self).map_err(SiteConfigError::SerializeError)?;

        fs::write(&path, content).map_err(SiteConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving site configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum SiteConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for SiteConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteConfigError::IoError(e) => write!(f, "IO error: {}", e),
            SiteConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            SiteConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for SiteConfigError {}
