//! Footnote side-table entries

use serde::Serialize;

/// A footnote extracted from a `![[...footnote...]][[body]]` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Footnote {
    /// Sequential 1-based id as a decimal string
    pub id: String,

    /// The placeholder label as written (e.g. "footnote", "Footnote 2")
    pub marker_text: String,

    /// Footnote body with inline markdown rendered to HTML
    pub rendered_content: String,
}

impl Footnote {
    /// Create a footnote with the given sequence number
    pub fn new(
        number: usize,
        marker_text: impl Into<String>,
        rendered_content: impl Into<String>,
    ) -> Self {
        Self {
            id: number.to_string(),
            marker_text: marker_text.into(),
            rendered_content: rendered_content.into(),
        }
    }

    /// Reference marker that replaces the placeholder in the body
    ///
    /// The presentation layer attaches its click handling to
    /// `data-footnote-id`, so the marker needs no further parsing.
    pub fn marker_html(&self) -> String {
        format!(
            "<span class=\"footnote-wrapper\"><button class=\"footnote-button\" data-footnote-id=\"{id}\">{id}</button></span>",
            id = self.id
        )
    }
}
