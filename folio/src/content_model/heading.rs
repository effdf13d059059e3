//! Table-of-contents entries

use serde::Serialize;

/// A heading with a generated anchor id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Anchor id (see `pipeline::markdown::heading_id`)
    pub id: String,
    /// Visible heading text with markup removed
    pub text: String,
    /// Heading level (2 or 3)
    pub level: u8,
}
