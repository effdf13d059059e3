//! Frontmatter metadata

use serde::Serialize;
use std::collections::BTreeMap;

/// Key/value metadata parsed from a `+++` frontmatter block
///
/// Keys are free-form; unknown keys are kept as-is so new fields can be
/// added to posts without touching the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keys (no frontmatter or an empty block)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Post title
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// Publication date, ISO `YYYY-MM-DD` by convention
    pub fn date(&self) -> Option<&str> {
        self.get("date")
    }

    /// Post author
    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    /// Short summary for listings
    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// Cover image path
    pub fn image(&self) -> Option<&str> {
        self.get("image")
    }

    /// Publication status, `published` when not set
    pub fn status(&self) -> &str {
        self.get("status").unwrap_or("published")
    }

    /// Serialize as a `+++` frontmatter block (including the trailing newline)
    ///
    /// Every value is written quoted, with backslashes, quotes and line
    /// breaks escaped, so `pipeline::frontmatter::extract` reads back
    /// exactly the same map.
    pub fn to_frontmatter(&self) -> String {
        let mut out = String::from("+++\n");
        for (key, value) in self.iter() {
            out.push_str(&format!("{} = \"{}\"\n", key, escape_value(value)));
        }
        out.push_str("+++\n");
        out
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_published() {
        let mut metadata = Metadata::new();
        assert_eq!(metadata.status(), "published");

        metadata.insert("status", "draft");
        assert_eq!(metadata.status(), "draft");
    }

    #[test]
    fn test_to_frontmatter_quotes_values() {
        let mut metadata = Metadata::new();
        metadata.insert("title", "Hello");
        metadata.insert("date", "2024-05-01");

        assert_eq!(
            metadata.to_frontmatter(),
            "+++\ndate = \"2024-05-01\"\ntitle = \"Hello\"\n+++\n"
        );
    }

    #[test]
    fn test_to_frontmatter_escapes_line_breaks_and_quotes() {
        let mut metadata = Metadata::new();
        metadata.insert("title", "line one\nline \"two\" \\ end");

        assert_eq!(
            metadata.to_frontmatter(),
            "+++\ntitle = \"line one\\nline \\\"two\\\" \\\\ end\"\n+++\n"
        );
    }
}
