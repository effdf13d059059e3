//! Footnote numbering and inline rendering
//!
//! A footnote is any placeholder whose label contains "footnote" and that
//! has a `[[body]]`. Footnotes are numbered from 1 in order of occurrence
//! across the whole document, and each one is replaced in the text by a
//! reference marker carrying its id.

use super::lexer::{self, Token};
use super::rewrite::PlaceholderKind;
use crate::content_model::Footnote;
use regex::Regex;
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));

/// Footnotes collected during one parse, in id order
#[derive(Debug, Default)]
pub struct FootnoteTable {
    footnotes: Vec<Footnote>,
}

impl FootnoteTable {
    /// Create an empty table; the first footnote pushed gets id 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a footnote and return it with its assigned id
    pub fn push(&mut self, label: &str, body: &str) -> &Footnote {
        let number = self.footnotes.len() + 1;
        log::debug!("Footnote {} ({})", number, label);
        self.footnotes
            .push(Footnote::new(number, label, render_inline(body)));
        &self.footnotes[number - 1]
    }

    /// Footnotes in id order
    pub fn into_footnotes(self) -> Vec<Footnote> {
        self.footnotes
    }
}

/// Replace every footnote placeholder in `body` with its reference marker
///
/// # Parameters
/// * `body` - Document body, usually after the media rewrite stages
///
/// # Returns
/// * The rewritten body and the footnotes in id order
pub fn process_footnotes(body: &str) -> (String, Vec<Footnote>) {
    let mut table = FootnoteTable::new();
    let mut out = String::with_capacity(body.len());

    for token in lexer::tokenize(body) {
        match token {
            Token::Text(text) | Token::Fence(text) => out.push_str(text),
            Token::Placeholder(placeholder) => match placeholder.target {
                Some(target)
                    if PlaceholderKind::classify(placeholder.label)
                        == PlaceholderKind::Footnote =>
                {
                    out.push_str(&table.push(placeholder.label, target).marker_html());
                }
                _ => out.push_str(placeholder.raw),
            },
        }
    }

    (out, table.into_footnotes())
}

/// Render the inline markdown allowed inside a footnote body
///
/// Links open in a new tab and line breaks (LF or CRLF) become `<br>`.
/// No headings, lists or code.
pub fn render_inline(body: &str) -> String {
    let html = LINK_RE.replace_all(
        body,
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
    );
    let html = BOLD_RE.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
    html.replace("\r\n", "\n").replace('\n', "<br>")
}
