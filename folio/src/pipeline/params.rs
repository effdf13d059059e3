//! Placeholder parameter lists
//!
//! Everything after the family word in a placeholder label is a list of
//! `key=value` pairs separated by commas and/or whitespace. Values may be
//! wrapped in double quotes (`poster="https://x.dev/a.png"`). Bare words
//! without `=` are ignored, as are keys a family does not know.

/// Parsed `key=value` pairs borrowed from a placeholder label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Params<'a> {
    /// Parse a parameter list
    pub fn parse(text: &'a str) -> Self {
        let mut pairs = Vec::new();
        let mut rest = text;

        loop {
            rest = rest.trim_start_matches(is_separator);
            if rest.is_empty() {
                break;
            }

            let key_len = rest
                .find(|c: char| c == '=' || is_separator(c))
                .unwrap_or(rest.len());
            let key = &rest[..key_len];
            rest = &rest[key_len..];

            let Some(after_eq) = rest.strip_prefix('=') else {
                // bare flag
                continue;
            };

            let (value, remaining) = match after_eq.strip_prefix('"') {
                Some(quoted) => match quoted.find('"') {
                    Some(end) => (&quoted[..end], &quoted[end + 1..]),
                    None => (quoted, ""),
                },
                None => {
                    let end = after_eq.find(is_separator).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            rest = remaining;

            if !key.is_empty() {
                pairs.push((key, value));
            }
        }

        Self { pairs }
    }

    /// Value of the first pair with this key
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Boolean value, accepting only the literals `true` and `false`
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    /// Pixel count from the leading digits of a value (`300`, `300px`)
    pub fn pixels(&self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        let digits_len = value
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len());
        value[..digits_len].parse().ok()
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}
