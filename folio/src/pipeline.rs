//! Content segmentation pipeline
//!
//! This module turns one raw document into a [`ParsedDocument`]:
//! 1. **Frontmatter**: split the `+++` metadata block from the body
//! 2. **Lexing**: scan the body once for placeholders and fenced code
//! 3. **Expansion**: expand each placeholder to inline markup, a widget
//!    segment or a notice, numbering footnotes as they appear
//! 4. **Assembly**: flush text between widgets through the tag extractor
//!    chain and the markdown renderer, keeping source order
//!
//! The pipeline has no I/O of its own. Asset lookups go through the
//! [`AssetSource`] in the [`RenderContext`].

use crate::assets::AssetSource;
use crate::content_model::{ContentWarning, Footnote, ParsedDocument, Segment};
use crate::site_config::ContentConfig;

pub mod extract;
pub mod footnotes;
pub mod frontmatter;
pub mod lexer;
pub mod markdown;
pub mod params;
pub mod rewrite;
pub mod toc;

pub use footnotes::process_footnotes;
pub use rewrite::{rewrite_text, PlaceholderKind};

use extract::Piece;
use footnotes::FootnoteTable;
use lexer::{Placeholder, Token};
use rewrite::Expansion;

/// Collaborators and settings for one parse
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Existence checks and folder listings
    pub assets: &'a dyn AssetSource,
    /// Base directories, default sizes and widget styling
    pub config: &'a ContentConfig,
}

impl<'a> RenderContext<'a> {
    /// Bundle an asset source with content settings
    pub fn new(assets: &'a dyn AssetSource, config: &'a ContentConfig) -> Self {
        Self { assets, config }
    }
}

/// Parse a raw document into metadata, segments and footnotes
///
/// Never fails: malformed frontmatter, unknown placeholders and missing
/// assets all degrade to text or visible notices.
///
/// # Parameters
/// * `raw` - Document text, optionally starting with a `+++` block
/// * `ctx` - Asset source and content settings
///
/// # Returns
/// * The parsed document, segments in source order
pub fn parse_document(raw: &str, ctx: &RenderContext<'_>) -> ParsedDocument {
    let (metadata, body) = frontmatter::extract(raw);

    let mut assembler = Assembler::default();
    let mut footnotes = FootnoteTable::new();

    for token in lexer::tokenize(body) {
        match token {
            Token::Text(text) => assembler.push_text(text),
            Token::Fence(fence) => assembler.push_fence(fence),
            Token::Placeholder(placeholder) => {
                if let Some(marker) = footnote_marker(&placeholder, &mut footnotes) {
                    assembler.push_text(&marker);
                    continue;
                }
                match rewrite::expand(&placeholder, ctx) {
                    Some(Expansion::Inline(markup)) => assembler.push_text(&markup),
                    Some(Expansion::Widget(segment)) => assembler.push_segment(segment),
                    Some(Expansion::Notice(warning)) => assembler.push_notice(warning),
                    None => assembler.push_text(placeholder.raw),
                }
            }
        }
    }

    let (segments, warnings) = assembler.finish();
    let footnotes = footnotes.into_footnotes();
    log::debug!(
        "Parsed document: {} segments, {} footnotes, {} warnings",
        segments.len(),
        footnotes.len(),
        warnings.len()
    );

    ParsedDocument {
        metadata,
        segments,
        footnotes,
        warnings,
    }
}

fn footnote_marker(placeholder: &Placeholder<'_>, table: &mut FootnoteTable) -> Option<String> {
    if PlaceholderKind::classify(placeholder.label) != PlaceholderKind::Footnote {
        return None;
    }
    let body = placeholder.target?;
    Some(table.push(placeholder.label, body).marker_html())
}

/// A body with every placeholder stage applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedBody {
    /// Body in tag form: widgets as `<Video ... />` etc., footnotes as markers
    pub body: String,
    /// Footnotes in id order
    pub footnotes: Vec<Footnote>,
    /// Problems recovered during expansion
    pub warnings: Vec<ContentWarning>,
}

/// Apply every placeholder stage to a body, producing the tag form
///
/// Equivalent to running [`rewrite_text`] for each of
/// [`PlaceholderKind::STAGES`] and then [`process_footnotes`], in one scan.
/// Fenced code is left as written.
pub fn expand_placeholders(body: &str, ctx: &RenderContext<'_>) -> ExpandedBody {
    let mut out = String::with_capacity(body.len());
    let mut footnotes = FootnoteTable::new();
    let mut warnings = Vec::new();

    for token in lexer::tokenize(body) {
        match token {
            Token::Text(text) | Token::Fence(text) => out.push_str(text),
            Token::Placeholder(placeholder) => {
                if let Some(marker) = footnote_marker(&placeholder, &mut footnotes) {
                    out.push_str(&marker);
                    continue;
                }
                match rewrite::expand(&placeholder, ctx) {
                    Some(expansion) => {
                        out.push_str(&expansion.to_source());
                        if let Expansion::Notice(warning) = expansion {
                            warnings.push(warning);
                        }
                    }
                    None => out.push_str(placeholder.raw),
                }
            }
        }
    }

    ExpandedBody {
        body: out,
        footnotes: footnotes.into_footnotes(),
        warnings,
    }
}

/// Builds the segment list, holding inline text until a widget or fence
/// forces a flush
#[derive(Debug, Default)]
struct Assembler {
    pending: String,
    segments: Vec<Segment>,
    warnings: Vec<ContentWarning>,
}

impl Assembler {
    fn push_text(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    fn push_segment(&mut self, segment: Segment) {
        self.flush();
        log::debug!("Segment {}", segment.kind());
        self.segments.push(segment);
    }

    fn push_notice(&mut self, warning: ContentWarning) {
        self.flush();
        self.segments.push(Segment::html(warning.to_notice_html()));
        self.warnings.push(warning);
    }

    fn push_fence(&mut self, fence: &str) {
        self.flush();
        self.segments.extend(markdown::render(fence));
    }

    /// Render pending text: tag extraction first, markdown for the rest
    fn flush(&mut self) {
        if self.pending.trim().is_empty() {
            self.pending.clear();
            return;
        }

        let text = std::mem::take(&mut self.pending);
        for piece in extract::extract_tags(&text) {
            match piece {
                Piece::Text(text) => self.segments.extend(markdown::render(text)),
                Piece::Segment(segment) => self.segments.push(segment),
                Piece::Notice(warning) => {
                    self.segments.push(Segment::html(warning.to_notice_html()));
                    self.warnings.push(warning);
                }
            }
        }
    }

    fn finish(mut self) -> (Vec<Segment>, Vec<ContentWarning>) {
        self.flush();
        (self.segments, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::content_model::Sketch;

    fn fixture_assets() -> MemoryAssets {
        MemoryAssets::new()
            .with_file("/assets/sketches/circles.js")
            .with_folder("/assets/images/trip", ["2.png", "1.jpg"])
            .with_folder("/assets/images/empty", ["README.txt"])
    }

    fn parse(raw: &str) -> ParsedDocument {
        let assets = fixture_assets();
        let config = ContentConfig::default();
        parse_document(raw, &RenderContext::new(&assets, &config))
    }

    #[test]
    fn test_image_placeholder_scenario() {
        // Arrange: A lone image placeholder
        let raw = "![[image width=300]][[photo.png]]";

        // Act: Parse
        let doc = parse(raw);

        // Assert: One HTML segment holding the sized <img>
        assert_eq!(doc.segments.len(), 1);
        let markup = doc.segments[0].markup().unwrap_or_default();
        assert!(markup.contains("<img "));
        assert!(markup.contains("src=\"/assets/images/photo.png\""));
        assert!(markup.contains("width:300px"));
        assert!(markup.contains("height:auto"));
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_empty_slideshow_scenario() {
        // Arrange: Paragraph followed by a slideshow over a folder with no images
        let raw = "Some text\n\n![[slideshow]][[/assets/images/empty]]";

        // Act: Parse
        let doc = parse(raw);

        // Assert: Paragraph then a warning notice, no slideshow segment
        assert_eq!(doc.segments.len(), 2);
        assert_eq!(doc.segments[0], Segment::html("<p>Some text</p>"));
        let notice = doc.segments[1].markup().unwrap_or_default();
        assert!(notice.contains("Warning:"));
        assert!(notice.contains("/assets/images/empty"));
        assert_eq!(
            doc.warnings,
            vec![ContentWarning::SlideshowEmpty {
                folder: "/assets/images/empty".to_string()
            }]
        );
    }

    #[test]
    fn test_two_footnotes_scenario() {
        let doc = parse("One![[footnote]][[first]] two![[footnote]][[second]]");

        let ids: Vec<&str> = doc.footnotes.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(doc.footnote("1").map(|f| f.rendered_content.as_str()), Some("first"));
        assert_eq!(doc.footnote("2").map(|f| f.rendered_content.as_str()), Some("second"));

        let markup = doc.segments[0].markup().unwrap_or_default();
        assert!(markup.contains("data-footnote-id=\"1\""));
        assert!(markup.contains("data-footnote-id=\"2\""));
    }

    #[test]
    fn test_fence_between_paragraphs_scenario() {
        let doc = parse("Before.\n\n```js\nconsole.log(1)\n```\n\nAfter.");

        let kinds: Vec<&str> = doc.segments.iter().map(Segment::kind).collect();
        assert_eq!(kinds, vec!["html", "code_block", "html"]);
        let Segment::CodeBlock(block) = &doc.segments[1] else {
            unreachable!()
        };
        assert_eq!(block.language, "js");
        assert!(block.filename.ends_with(".js"));
    }

    #[test]
    fn test_segments_follow_source_order() {
        // Arrange: Every structural family interleaved with text
        let raw = concat!(
            "+++\ntitle = \"Order\"\n+++\n",
            "Alpha\n\n",
            "![[video]][[a.mp4]]\n",
            "Beta\n\n",
            "![[p5js width=400, height=300]][[circles.js]]\n",
            "![[pdf]][[b.pdf]]\n",
            "Gamma\n\n",
            "![[slideshow]][[trip]]\n",
            "```rust\nfn main() {}\n```\n",
            "<Video src=\"/authored.mp4\" className=\"x\" />\n",
            "Delta"
        );

        // Act: Parse
        let doc = parse(raw);

        // Assert: Kinds in exactly the written order
        let kinds: Vec<&str> = doc.segments.iter().map(Segment::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "html",
                "video",
                "html",
                "sketch",
                "pdf",
                "html",
                "slideshow",
                "code_block",
                "video",
                "html"
            ]
        );
        assert_eq!(doc.metadata.title(), Some("Order"));
        assert_eq!(
            doc.segments[3],
            Segment::Sketch(Sketch::new(
                "/assets/sketches/circles.js",
                400,
                300,
                "border rounded-lg shadow-lg my-8"
            ))
        );
    }

    #[test]
    fn test_footnote_numbering_across_media() {
        let doc = parse(concat!(
            "![[image]][[a.png]] A![[footnote]][[one]]\n\n",
            "![[video]][[v.mp4]]\n\n",
            "![[slideshow]][[missing]] B![[Footnote two]][[two]]\n\n",
            "```\n![[footnote]][[inside code]]\n```\n",
            "C![[footnote]][[three]]"
        ));

        let contents: Vec<(&str, &str)> = doc
            .footnotes
            .iter()
            .map(|f| (f.id.as_str(), f.rendered_content.as_str()))
            .collect();
        assert_eq!(contents, vec![("1", "one"), ("2", "two"), ("3", "three")]);
    }

    #[test]
    fn test_missing_sketch_continues_rendering() {
        let doc = parse("Start\n\n![[p5js]][[gone.js]]\n\nEnd");

        assert_eq!(doc.segments.len(), 3);
        assert!(doc.segments[1]
            .markup()
            .is_some_and(|m| m.contains("Error:") && m.contains("gone.js")));
        assert_eq!(doc.segments[2], Segment::html("<p>End</p>"));
        assert_eq!(doc.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_and_malformed_placeholders_pass_through() {
        let doc = parse("Keep ![[gallery]][[x]] and ![[image]] and ![[video");

        assert_eq!(
            doc.segments,
            vec![Segment::html(
                "<p>Keep ![[gallery]][[x]] and ![[image]] and ![[video</p>"
            )]
        );
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let doc = parse("+++\ntitle = \"x\"\n\nHello");

        assert!(doc.metadata.is_empty());
        assert_eq!(doc.segments, vec![Segment::html("<p>+++\ntitle = \"x\"</p>\n<p>Hello</p>")]);
    }

    #[test]
    fn test_expand_placeholders_tag_form() {
        // Arrange: Body with media, a footnote and a missing sketch
        let assets = fixture_assets();
        let config = ContentConfig::default();
        let ctx = RenderContext::new(&assets, &config);
        let body = "A![[newline]]B ![[video loop=true]][[v.mp4]] ![[p5js]][[nope.js]] ![[footnote]][[n]]";

        // Act: Expand
        let expanded = expand_placeholders(body, &ctx);

        // Assert: Tags, marker and notice in place; warning recorded
        assert!(expanded.body.starts_with("A<br>B <Video src=\"/assets/video/v.mp4\""));
        assert!(expanded.body.contains("loop={true}"));
        assert!(expanded.body.contains("<strong>Error:</strong>"));
        assert!(expanded.body.contains("data-footnote-id=\"1\""));
        assert_eq!(expanded.footnotes.len(), 1);
        assert_eq!(expanded.warnings.len(), 1);

        // Act: Expand again
        let again = expand_placeholders(&expanded.body, &ctx);

        // Assert: Nothing left to expand
        assert_eq!(again.body, expanded.body);
        assert!(again.footnotes.is_empty());
    }

    #[test]
    fn test_expand_matches_staged_rewrites() {
        let assets = fixture_assets();
        let config = ContentConfig::default();
        let ctx = RenderContext::new(&assets, &config);
        let body = "![[p5js]][[circles.js]] ![[image]][[a.png]] ![[slideshow]][[trip]] ![[footnote]][[n]] ![[pdf]][[d.pdf]]";

        let staged = PlaceholderKind::STAGES
            .iter()
            .fold(body.to_string(), |text, kind| rewrite_text(&text, *kind, &ctx));
        let (staged, _) = process_footnotes(&staged);

        assert_eq!(expand_placeholders(body, &ctx).body, staged);
    }

    #[test]
    fn test_crlf_document_renders_like_lf() {
        // Arrange: Frontmatter and body with Windows line endings
        let raw = "+++\r\ntitle = \"T\"\r\n+++\r\n## Intro\r\n\r\nSome text![[newline]]more\r\n";

        // Act: Parse
        let doc = parse(raw);

        // Assert: Same output as LF input, no stray carriage returns
        assert_eq!(doc.metadata.title(), Some("T"));
        assert_eq!(
            doc.segments,
            vec![Segment::html(
                "<h2 id=\"intro\">Intro</h2>\n<p>Some text<br>more</p>"
            )]
        );
        assert_eq!(doc, parse(&raw.replace("\r\n", "\n")));
    }

    #[test]
    fn test_footnote_in_heading_stays_out_of_anchor() {
        let doc = parse("## Setup![[footnote]][[Details]]\n\nBody");

        let markup = doc.segments[0].markup().unwrap_or_default();
        assert!(markup.starts_with("<h2 id=\"setup\">Setup<span class=\"footnote-wrapper\">"));
        assert_eq!(doc.headings().len(), 1);
        assert_eq!(doc.headings()[0].id, "setup");
        assert_eq!(doc.headings()[0].text, "Setup");
        assert_eq!(doc.footnotes.len(), 1);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let raw = "## Title\n\n![[footnote]][[x]] ![[video]][[v.mp4]]";
        assert_eq!(parse(raw), parse(raw));
    }
}
