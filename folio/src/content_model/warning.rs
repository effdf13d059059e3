//! Problems recovered while expanding placeholders
//!
//! None of these abort a parse. Each one is substituted in the segment list
//! by a visible notice and also recorded on the parsed document.

use super::escape_html;
use serde::Serialize;
use thiserror::Error;

/// How a notice is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A referenced resource is missing or unreadable
    Error,
    /// The content itself needs attention
    Warning,
}

/// A locally recovered content problem
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentWarning {
    /// The sketch script referenced by a p5js placeholder does not exist
    #[error("P5.js sketch file \"{filename}\" not found in sketches directory.")]
    SketchNotFound {
        /// File name as written in the placeholder
        filename: String,
    },

    /// The folder referenced by a slideshow placeholder does not exist
    #[error("Slideshow folder \"{folder}\" not found.")]
    SlideshowFolderNotFound {
        /// Public folder path
        folder: String,
    },

    /// The slideshow folder exists but could not be listed
    #[error("Failed to read slideshow folder \"{folder}\".")]
    SlideshowFolderUnreadable {
        /// Public folder path
        folder: String,
        /// Underlying error message
        reason: String,
    },

    /// The slideshow folder contains no supported image files
    #[error("No image files found in slideshow folder \"{folder}\".")]
    SlideshowEmpty {
        /// Public folder path
        folder: String,
    },

    /// A slideshow tag carried an image list that is not a JSON string array
    #[error("Failed to parse slideshow images.")]
    SlideshowImagesMalformed {
        /// Deserialization error message
        reason: String,
    },
}

impl ContentWarning {
    /// How the notice is styled; only an empty slideshow is a warning
    pub fn severity(&self) -> Severity {
        match self {
            ContentWarning::SlideshowEmpty { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Visible notice that takes the place of the widget
    pub fn to_notice_html(&self) -> String {
        let (classes, label) = match self.severity() {
            Severity::Error => ("bg-red-100 border border-red-400 text-red-700", "Error:"),
            Severity::Warning => (
                "bg-yellow-100 border border-yellow-400 text-yellow-700",
                "Warning:",
            ),
        };
        format!(
            "<div class=\"{} px-4 py-3 rounded my-8\"><strong>{}</strong> {}</div>",
            classes,
            label,
            escape_html(&self.to_string())
        )
    }
}
