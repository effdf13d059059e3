//! Markdown-to-HTML renderer
//!
//! The terminal stage: turns the plain text left between widgets into HTML
//! segments and code block segments. The dialect is small and regex-driven.
//! Inline HTML is passed through unescaped; content is author-controlled.

use crate::content_model::{CodeBlock, Segment};
use itertools::Itertools;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([\w+#.-]*)\r?\n(.*?)```").expect("valid fence regex")
});
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid inline code regex"));
static H3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid h3 regex"));
static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").expect("valid h2 regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid h1 regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static ORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.+)$").expect("valid ordered item regex"));
static UNORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+(.+)$").expect("valid unordered item regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static FOOTNOTE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="footnote-wrapper">.*?</span>"#).expect("valid footnote marker regex")
});

/// Render a text span into segments
///
/// Fenced code blocks become `CodeBlock` segments; the text around them is
/// rendered to HTML. Spans that render to nothing produce no segment.
/// CRLF line endings are read as LF.
pub fn render(text: &str) -> Vec<Segment> {
    let normalized = normalize_newlines(text);
    let text: &str = &normalized;
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FENCE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_html(&mut segments, &text[last..whole.start()]);

        let language = caps.get(1).map(|m| m.as_str());
        let code = trim_blank_lines(&caps[2]);
        log::debug!("Code block ({})", language.unwrap_or("text"));
        segments.push(Segment::CodeBlock(CodeBlock::new(language, code)));
        last = whole.end();
    }
    push_html(&mut segments, &text[last..]);

    segments
}

fn push_html(segments: &mut Vec<Segment>, text: &str) {
    let markup = render_html(text);
    if !markup.trim().is_empty() {
        segments.push(Segment::html(markup));
    }
}

/// Render markdown without fenced code to HTML
///
/// Rules run in a fixed order: inline code, headings, bold, italic, links,
/// lists, then paragraphs.
pub fn render_html(text: &str) -> String {
    let text = normalize_newlines(text);
    let html = INLINE_CODE_RE.replace_all(&text, r#"<code class="inline-code">$1</code>"#);
    let html = H3_RE.replace_all(&html, |caps: &Captures<'_>| heading(3, &caps[1]));
    let html = H2_RE.replace_all(&html, |caps: &Captures<'_>| heading(2, &caps[1]));
    let html = H1_RE.replace_all(&html, "<h1>$1</h1>");
    let html = BOLD_RE.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
    let html = LINK_RE.replace_all(&html, r#"<a href="$2">$1</a>"#);
    let html = wrap_lists(&html);
    wrap_paragraphs(&html)
}

fn heading(level: u8, text: &str) -> String {
    format!(
        "<h{level} id=\"{id}\">{text}</h{level}>",
        level = level,
        id = heading_id(text),
        text = text
    )
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Heading markup reduced to the text a reader sees
///
/// Footnote reference markers are dropped along with their number, then
/// every remaining tag is removed.
pub fn visible_text(html: &str) -> String {
    let without_markers = FOOTNOTE_MARKER_RE.replace_all(html, "");
    TAG_RE.replace_all(&without_markers, "").into_owned()
}

/// Anchor id for a heading
///
/// Lowercases the visible text (tags and footnote markers removed),
/// collapses every run of characters outside `a-z0-9` into one hyphen and
/// trims hyphens from both ends: `"Hello, World!"` becomes `hello-world`.
pub fn heading_id(text: &str) -> String {
    let visible = visible_text(text);
    let mut id = String::with_capacity(visible.len());
    for c in visible.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c);
        } else if !id.ends_with('-') {
            id.push('-');
        }
    }
    id.trim_matches('-').to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Ordered,
    Unordered,
    Other,
}

fn line_kind(line: &str) -> LineKind {
    if ORDERED_ITEM_RE.is_match(line) {
        LineKind::Ordered
    } else if UNORDERED_ITEM_RE.is_match(line) {
        LineKind::Unordered
    } else {
        LineKind::Other
    }
}

/// Wrap runs of consecutive list item lines in one list element
fn wrap_lists(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (kind, group) in &text.split('\n').chunk_by(|line| line_kind(line)) {
        let (tag, item_re) = match kind {
            LineKind::Ordered => ("ol", &ORDERED_ITEM_RE),
            LineKind::Unordered => ("ul", &UNORDERED_ITEM_RE),
            LineKind::Other => {
                lines.extend(group.map(str::to_string));
                continue;
            }
        };

        let mut list = format!("<{}>", tag);
        for line in group {
            let item = item_re.replace(line, "<li>$1</li>");
            list.push('\n');
            list.push_str(&item);
        }
        list.push_str(&format!("\n</{}>", tag));
        lines.push(list);
    }

    lines.join("\n")
}

/// Wrap blank-line separated blocks in `<p>`
///
/// Headings, lists and blocks holding a footnote marker are left bare.
fn wrap_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if block.starts_with("<h")
                || block.starts_with("<ul>")
                || block.starts_with("<ol>")
                || block.contains("footnote-wrapper")
            {
                block.to_string()
            } else {
                format!("<p>{}</p>", block)
            }
        })
        .join("\n")
}

/// Drop blank lines at the start and end, keeping indentation inside
fn trim_blank_lines(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_id_examples() {
        assert_eq!(heading_id("Hello, World!"), "hello-world");
        assert_eq!(heading_id("  --Leading--  "), "leading");
        assert_eq!(heading_id("Step 2: <code class=\"inline-code\">cargo</code>"), "step-2-cargo");
        assert_eq!(heading_id("Café au lait"), "caf-au-lait");
        assert_eq!(heading_id("!!!"), "");
    }

    #[test]
    fn test_heading_id_ignores_footnote_marker() {
        let marker = "<span class=\"footnote-wrapper\"><button class=\"footnote-button\" data-footnote-id=\"2\">2</button></span>";

        assert_eq!(heading_id(&format!("Setup{}", marker)), "setup");
        assert_eq!(visible_text(&format!("Setup{} <em>now</em>", marker)), "Setup now");
    }

    #[test]
    fn test_crlf_text_renders_like_lf() {
        // Arrange: Heading and paragraph with Windows line endings
        let text = "## Hello\r\n\r\nText\r\n";

        // Act: Render
        let html = render_html(text);

        // Assert: No stray carriage returns, paragraph wrapped
        assert_eq!(html, "<h2 id=\"hello\">Hello</h2>\n<p>Text</p>");
    }

    #[test]
    fn test_crlf_code_block_keeps_lines() {
        let segments = render("Intro\r\n\r\n```rust\r\nfn a() {}\r\n\r\nfn b() {}\r\n```\r\n");

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::html("<p>Intro</p>"));
        assert_eq!(
            segments[1],
            Segment::CodeBlock(CodeBlock::new(Some("rust"), "fn a() {}\n\nfn b() {}"))
        );
    }

    #[test]
    fn test_headings_get_ids_from_h2_down() {
        // Arrange: One heading of each level
        let text = "# Title\n\n## Getting Started\n\n### Fine print";

        // Act: Render
        let html = render_html(text);

        // Assert: h1 has no id, h2/h3 do, none wrapped in <p>
        assert_eq!(
            html,
            "<h1>Title</h1>\n<h2 id=\"getting-started\">Getting Started</h2>\n<h3 id=\"fine-print\">Fine print</h3>"
        );
    }

    #[test]
    fn test_inline_formatting() {
        let html = render_html("Use `cargo` with **care** and *style*, see [docs](https://x.dev).");

        assert_eq!(
            html,
            "<p>Use <code class=\"inline-code\">cargo</code> with <strong>care</strong> and <em>style</em>, see <a href=\"https://x.dev\">docs</a>.</p>"
        );
    }

    #[test]
    fn test_consecutive_items_share_one_list() {
        // Arrange: Ordered list, paragraph, unordered list
        let text = "1. one\n2. two\n\nBetween\n\n- a\n- b\n- c";

        // Act: Render
        let html = render_html(text);

        // Assert: One <ol> and one <ul>, each holding all its items
        assert_eq!(
            html,
            "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n<p>Between</p>\n<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>"
        );
    }

    #[test]
    fn test_footnote_marker_blocks_are_not_wrapped() {
        let text = "Claim<span class=\"footnote-wrapper\"><button class=\"footnote-button\" data-footnote-id=\"1\">1</button></span>\n\nPlain";

        let html = render_html(text);

        assert!(html.starts_with("Claim<span class=\"footnote-wrapper\">"));
        assert!(html.ends_with("\n<p>Plain</p>"));
    }

    #[test]
    fn test_inline_html_passes_through() {
        let html = render_html("<img src=\"/a.png\"/> & <b>x</b>");
        assert_eq!(html, "<p><img src=\"/a.png\"/> & <b>x</b></p>");
    }

    #[test]
    fn test_fence_between_paragraphs_yields_three_segments() {
        // Arrange: js fence between two paragraphs
        let text = "First paragraph.\n\n```js\nconsole.log(1)\n```\n\nSecond paragraph.";

        // Act: Render
        let segments = render(text);

        // Assert: Html, CodeBlock, Html in order
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::html("<p>First paragraph.</p>"));
        match &segments[1] {
            Segment::CodeBlock(block) => {
                assert_eq!(block.language, "js");
                assert_eq!(block.code, "console.log(1)");
                assert!(block.filename.ends_with(".js"));
            }
            other => panic!("expected code block, got {:?}", other),
        }
        assert_eq!(segments[2], Segment::html("<p>Second paragraph.</p>"));
    }

    #[test]
    fn test_code_keeps_inner_whitespace() {
        let segments = render("```python\n\n    def f():\n        return 1\n\n```");

        assert_eq!(
            segments,
            vec![Segment::CodeBlock(CodeBlock::new(
                Some("python"),
                "    def f():\n        return 1"
            ))]
        );
        let Segment::CodeBlock(block) = &segments[0] else {
            unreachable!()
        };
        assert!(block.filename.ends_with(".py"));
    }

    #[test]
    fn test_fence_without_language_is_text() {
        let segments = render("```\nplain\n```");

        assert_eq!(segments, vec![Segment::CodeBlock(CodeBlock::new(None, "plain"))]);
    }

    #[test]
    fn test_markdown_inside_code_is_not_rendered() {
        let segments = render("```md\n# Not a heading\n**raw**\n```");

        assert_eq!(
            segments,
            vec![Segment::CodeBlock(CodeBlock::new(Some("md"), "# Not a heading\n**raw**"))]
        );
    }

    #[test]
    fn test_blank_text_renders_nothing() {
        assert!(render("").is_empty());
        assert!(render("\n\n  \n").is_empty());
    }
}
