//! Frontmatter extraction
//!
//! A document may open with a block delimited by `+++` lines:
//!
//! ```text
//! +++
//! title = "Drawing with noise"
//! date = 2024-03-02
//! +++
//! Body starts here.
//! ```
//!
//! Each non-blank line is split on the first `" = "`. A single pair of
//! surrounding double quotes is stripped from the value, and inside quotes
//! `\\`, `\"`, `\n` and `\r` escapes are decoded. Lines without the
//! separator are ignored.

use crate::content_model::Metadata;

const DELIMITER: &str = "+++";

/// Split a raw document into metadata and body
///
/// Total: a document without an opening delimiter, or with an opening
/// delimiter but no closing one, is returned whole as the body with empty
/// metadata.
pub fn extract(raw: &str) -> (Metadata, &str) {
    let Some(after_open) = strip_delimiter_line(raw) else {
        return (Metadata::new(), raw);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if is_delimiter(line) {
            let block = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (parse_block(block), body);
        }
        offset += line.len();
    }

    log::debug!("Frontmatter opened without a closing delimiter, treating input as body");
    (Metadata::new(), raw)
}

/// If `text` starts with a delimiter line, return what follows it
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let first_line = text.split_inclusive('\n').next()?;
    if !is_delimiter(first_line) || !first_line.ends_with('\n') {
        return None;
    }
    Some(&text[first_line.len()..])
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parse `key = value` lines
fn parse_block(block: &str) -> Metadata {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (key, value) = line.split_once(" = ")?;
            Some((key.trim().to_string(), unquote(value.trim())))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        unescape(&value[1..value.len() - 1])
    } else {
        value.to_string()
    }
}

/// Decode the escapes `Metadata::to_frontmatter` writes; unknown escapes
/// are kept as written
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_quoted_and_bare_values() {
        // Arrange: Frontmatter with quoted and unquoted values
        let raw = "+++\ntitle = \"Drawing with noise\"\ndate = 2024-03-02\n+++\nBody text";

        // Act: Extract frontmatter
        let (metadata, body) = extract(raw);

        // Assert: Both values parsed, quotes stripped, body intact
        assert_eq!(metadata.title(), Some("Drawing with noise"));
        assert_eq!(metadata.date(), Some("2024-03-02"));
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_extract_without_frontmatter() {
        let raw = "Just a body\n+++\nnot metadata";

        let (metadata, body) = extract(raw);

        assert!(metadata.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_extract_unclosed_frontmatter_falls_back() {
        // Arrange: Opening delimiter with no closing delimiter
        let raw = "+++\ntitle = \"Oops\"\nBody without end";

        // Act: Extract frontmatter
        let (metadata, body) = extract(raw);

        // Assert: Whole input is body, metadata empty
        assert!(metadata.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_extract_splits_on_first_separator_only() {
        let raw = "+++\nequation = a = b\n+++\n";

        let (metadata, body) = extract(raw);

        assert_eq!(metadata.get("equation"), Some("a = b"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_extract_ignores_blank_and_malformed_lines() {
        let raw = "+++\n\ntitle = \"T\"\nnot a pair\nkey=value\n+++\nBody";

        let (metadata, body) = extract(raw);

        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.title(), Some("T"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_extract_keeps_unknown_keys() {
        let raw = "+++\nglowColor = \"#ff00aa\"\ncategories = \"art, code\"\n+++\n";

        let (metadata, _) = extract(raw);

        assert_eq!(metadata.get("glowColor"), Some("#ff00aa"));
        assert_eq!(metadata.get("categories"), Some("art, code"));
    }

    #[test]
    fn test_extract_closing_delimiter_at_end_of_input() {
        let raw = "+++\ntitle = \"T\"\n+++";

        let (metadata, body) = extract(raw);

        assert_eq!(metadata.title(), Some("T"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_frontmatter_round_trip() {
        // Arrange: Metadata with values containing spaces, quotes and separators
        let mut metadata = Metadata::new();
        metadata.insert("title", "A \"quoted\" title");
        metadata.insert("description", "x = y, and more");
        metadata.insert("padded", "  spaced  ");
        let body = "\n# Heading\n\nParagraph +++ inline\n";

        // Act: Serialize then extract
        let raw = format!("{}{}", metadata.to_frontmatter(), body);
        let (parsed, parsed_body) = extract(&raw);

        // Assert: Same metadata and body come back
        assert_eq!(parsed, metadata);
        assert_eq!(parsed_body, body);
    }

    #[test]
    fn test_frontmatter_round_trip_multiline_values() {
        // Arrange: Values with line breaks, backslashes and a trailing quote
        let mut metadata = Metadata::new();
        metadata.insert("title", "line one\nline two");
        metadata.insert("description", "first\r\nsecond \\ third \"");
        metadata.insert("path", "C:\\posts\\notes");

        // Act: Serialize then extract
        let raw = format!("{}Body", metadata.to_frontmatter());
        let (parsed, body) = extract(&raw);

        // Assert: Every value survives unchanged
        assert_eq!(parsed, metadata);
        assert_eq!(parsed.title(), Some("line one\nline two"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_extract_keeps_unknown_escapes() {
        let raw = "+++\nimage = \"C:\\media\\a.png\"\n+++\n";

        let (metadata, _) = extract(raw);

        assert_eq!(metadata.image(), Some("C:\\media\\a.png"));
    }

    #[test]
    fn test_empty_metadata_round_trip() {
        let metadata = Metadata::new();
        let raw = format!("{}Body", metadata.to_frontmatter());

        let (parsed, body) = extract(&raw);

        assert!(parsed.is_empty());
        assert_eq!(body, "Body");
    }
}
