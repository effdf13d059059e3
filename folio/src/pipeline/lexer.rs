//! Single-pass scanner for the placeholder dialect
//!
//! The body is scanned once, left to right, for the two openers the dialect
//! knows about:
//!
//! * `![[label]]`, optionally followed by `[[target]]`
//! * a code fence: three backticks, an optional language tag, a newline,
//!   then everything up to the next three backticks
//!
//! Everything else is plain text. Fences are kept verbatim so placeholders
//! written inside code are never expanded; the markdown renderer splits them
//! out later.

const PLACEHOLDER_OPEN: &str = "![[";
const BRACKET_OPEN: &str = "[[";
const BRACKET_CLOSE: &str = "]]";
const FENCE: &str = "```";

/// A lexical unit of the body, borrowing from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text
    Text(&'a str),

    /// A complete fenced code block, delimiters included
    Fence(&'a str),

    /// A double-bracket placeholder
    Placeholder(Placeholder<'a>),
}

/// A `![[label]][[target]]` placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The whole placeholder as written
    pub raw: &'a str,

    /// Text inside the first bracket pair
    pub label: &'a str,

    /// Text inside the second bracket pair, if there is one
    pub target: Option<&'a str>,
}

/// Split a body into tokens
///
/// Adjacent plain text is merged into one `Text` token, so every text token
/// sits between two non-text tokens (or the ends of the input).
pub fn tokenize(body: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];

        let matched = if rest.starts_with(PLACEHOLDER_OPEN) {
            scan_placeholder(rest).map(|(len, placeholder)| (len, Token::Placeholder(placeholder)))
        } else if rest.starts_with(FENCE) {
            scan_fence(rest).map(|len| (len, Token::Fence(&rest[..len])))
        } else {
            None
        };

        match matched {
            Some((len, token)) => {
                if text_start < pos {
                    tokens.push(Token::Text(&body[text_start..pos]));
                }
                tokens.push(token);
                pos += len;
                text_start = pos;
            }
            None => {
                pos += next_char_len(rest);
            }
        }
    }

    if text_start < body.len() {
        tokens.push(Token::Text(&body[text_start..]));
    }

    tokens
}

/// Scan a placeholder at the start of `text`
///
/// Returns the consumed length. The label runs to the first `]` and must be
/// followed by `]]`. A `newline` label never takes a target, so text such as
/// `![[newline]][[x]]` leaves `[[x]]` as plain text.
fn scan_placeholder(text: &str) -> Option<(usize, Placeholder<'_>)> {
    let label_start = PLACEHOLDER_OPEN.len();
    let label_len = text[label_start..].find(']')?;
    let label_end = label_start + label_len;
    if !text[label_end..].starts_with(BRACKET_CLOSE) {
        return None;
    }
    let label = &text[label_start..label_end];
    let mut end = label_end + BRACKET_CLOSE.len();

    let mut target = None;
    if label.trim() != "newline" && text[end..].starts_with(BRACKET_OPEN) {
        let target_start = end + BRACKET_OPEN.len();
        if let Some(target_len) = text[target_start..].find(BRACKET_CLOSE) {
            target = Some(&text[target_start..target_start + target_len]);
            end = target_start + target_len + BRACKET_CLOSE.len();
        }
    }

    Some((
        end,
        Placeholder {
            raw: &text[..end],
            label,
            target,
        },
    ))
}

/// Scan a fenced code block at the start of `text`
///
/// The opening fence must be followed by an optional language tag and a
/// newline; an unterminated fence is not a fence.
fn scan_fence(text: &str) -> Option<usize> {
    let after_open = &text[FENCE.len()..];
    let lang_len = after_open
        .find(|c: char| !is_language_char(c))
        .unwrap_or(after_open.len());
    let after_lang = &after_open[lang_len..];

    let newline_len = if after_lang.starts_with('\n') {
        1
    } else if after_lang.starts_with("\r\n") {
        2
    } else {
        return None;
    };

    let content_start = FENCE.len() + lang_len + newline_len;
    let close = text[content_start..].find(FENCE)?;
    Some(content_start + close + FENCE.len())
}

/// Characters accepted in a fence language tag (`c++`, `objective-c`, `c#`)
pub(crate) fn is_language_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '-' | '#' | '.')
}

fn next_char_len(text: &str) -> usize {
    text.chars().next().map_or(1, char::len_utf8)
}
