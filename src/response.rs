use mime::Mime;
use reqwest::{header, Response};
use syntect::{
    easy::HighlightLines,
    highlighting::{Style, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
    util::{as_24_bit_terminal_escaped, LinesWithEndings},
};

pub fn get_content_type(resp: &Response) -> Option<Mime> {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// `application/json` and `+json` suffixed types.
pub fn is_json(m: &Mime) -> bool {
    m.essence_str() == mime::APPLICATION_JSON.essence_str()
        || m.suffix().is_some_and(|s| s == mime::JSON)
}

/// Cuts `s` to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Two-space indented rendering that keeps the server's key order.
/// Anything that does not parse is returned unchanged.
pub fn pretty_json(body: &str) -> String {
    // jsonxf reformats tokens without validating them
    if serde_json::from_str::<serde::de::IgnoredAny>(body).is_err() {
        return body.to_string();
    }
    match jsonxf::pretty_print(body) {
        Ok(pretty) => pretty.trim_end().to_string(),
        Err(_) => body.to_string(),
    }
}

pub fn json_preview(body: &str, max: usize) -> String {
    truncate_chars(&pretty_json(body), max).to_string()
}

pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Terminal-escaped rendering of `s`; falls back to the plain text if a
    /// line cannot be highlighted (truncated JSON often ends mid-token).
    pub fn highlight(&self, s: &str, ext: &str) -> String {
        let syntax: &SyntaxReference = self
            .syntaxes
            .find_syntax_by_extension(ext)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let Some(theme) = self.themes.themes.get("base16-ocean.dark") else {
            return s.to_string();
        };
        let mut h = HighlightLines::new(syntax, theme);

        let mut out = String::with_capacity(s.len() * 2);
        for line in LinesWithEndings::from(s) {
            match h.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    out.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => out.push_str(line),
            }
        }
        out.push_str("\x1b[0m");
        out
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
