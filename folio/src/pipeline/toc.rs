//! Table of contents from rendered headings

use super::markdown::visible_text;
use crate::content_model::{Heading, Segment};
use regex::Regex;
use std::sync::LazyLock;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<h([23]) id="([^"]*)">(.*?)</h[23]>"#).expect("valid heading regex")
});

/// Collect the anchored headings (h2, h3) from HTML segments in order
pub fn collect_headings(segments: &[Segment]) -> Vec<Heading> {
    segments
        .iter()
        .filter_map(Segment::markup)
        .flat_map(|markup| HEADING_RE.captures_iter(markup))
        .filter_map(|caps| {
            let level = caps[1].parse().ok()?;
            Some(Heading {
                id: caps[2].to_string(),
                text: visible_text(&caps[3]),
                level,
            })
        })
        .filter(|heading| !heading.id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_model::CodeBlock;

    #[test]
    fn test_collect_headings_in_order() {
        // Arrange: Headings spread over several segments
        let segments = vec![
            Segment::html("<h1>Title</h1>\n<h2 id=\"intro\">Intro</h2>"),
            Segment::CodeBlock(CodeBlock::new(Some("html"), "<h2 id=\"fake\">Fake</h2>")),
            Segment::html("<p>Text</p>\n<h3 id=\"setup-cargo\">Setup <code class=\"inline-code\">cargo</code></h3>"),
        ];

        // Act: Collect
        let headings = collect_headings(&segments);

        // Assert: h1 and code skipped, tags stripped from text
        assert_eq!(
            headings,
            vec![
                Heading {
                    id: "intro".to_string(),
                    text: "Intro".to_string(),
                    level: 2
                },
                Heading {
                    id: "setup-cargo".to_string(),
                    text: "Setup cargo".to_string(),
                    level: 3
                },
            ]
        );
    }

    #[test]
    fn test_footnote_marker_left_out_of_heading_text() {
        let segments = vec![Segment::html(
            "<h2 id=\"h\">H<span class=\"footnote-wrapper\"><button class=\"footnote-button\" data-footnote-id=\"2\">2</button></span></h2>",
        )];

        let headings = collect_headings(&segments);

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "H");
    }

    #[test]
    fn test_headings_without_id_are_skipped() {
        let segments = vec![Segment::html("<h2 id=\"\">!!!</h2>")];
        assert!(collect_headings(&segments).is_empty());
    }
}
