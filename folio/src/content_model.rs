//! Content model produced by the segmentation pipeline
//!
//! This module defines the structures handed to the presentation layer after
//! a document has been parsed: metadata from the frontmatter block, the ordered
//! list of render segments, the footnote side-table and any problems that were
//! recovered locally while expanding placeholders.

use serde::Serialize;

// Submodules
mod footnote;
mod heading;
mod metadata;
mod segment;
mod warning;

// Re-export public types
pub use footnote::Footnote;
pub use heading::Heading;
pub use metadata::Metadata;
pub use segment::{file_extension, CodeBlock, Dimensions, Pdf, Segment, Sketch, Slideshow, Video};
pub use warning::{ContentWarning, Severity};

/// Result of one parse call over a raw document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Metadata parsed from the `+++` frontmatter block (empty if absent)
    pub metadata: Metadata,

    /// Render segments in strict source order
    pub segments: Vec<Segment>,

    /// Footnotes in order of first occurrence, ids `1, 2, 3, ...`
    pub footnotes: Vec<Footnote>,

    /// Problems recovered while expanding placeholders
    ///
    /// Each entry also appears in `segments` as a visible notice.
    pub warnings: Vec<ContentWarning>,
}

impl ParsedDocument {
    /// Look up a footnote by its id
    pub fn footnote(&self, id: &str) -> Option<&Footnote> {
        self.footnotes.iter().find(|footnote| footnote.id == id)
    }

    /// Headings that carry an anchor id (h2 and h3), in document order
    pub fn headings(&self) -> Vec<Heading> {
        crate::pipeline::toc::collect_headings(&self.segments)
    }

    /// Number of segments that are not plain HTML
    pub fn widget_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_html()).count()
    }
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
