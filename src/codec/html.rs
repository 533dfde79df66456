//! Built-in text conversions for `.txt` and `.html` comment bodies.
//!
//! HTML sanitizing here is best-effort textual removal of `<script>`, `<style>` and comment
//! blocks, not an HTML parse. Unterminated blocks, or markup that only becomes a script tag once a
//! browser repairs it, pass through unchanged. This is a known limitation.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern is valid")
});

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style pattern is valid")
});

static HTML_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

pub const LINE_BREAK: &str = "<br />";

/// Escapes the characters that are significant in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Puts an explicit `<br />` in front of every line break (CRLF is normalised to LF).
pub fn convert_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\n', &format!("{LINE_BREAK}\n"))
}

/// Plain text rendered safely inside HTML, keeping its line layout.
pub fn plain_text(body: &str) -> String {
    convert_line_breaks(&escape_html(body))
}

/// Strips script, style and comment blocks, then converts line breaks.
pub fn sanitize_html(body: &str) -> String {
    let stripped = SCRIPT_BLOCK.replace_all(body, "");
    let stripped = HTML_COMMENT.replace_all(&stripped, "");
    let stripped = STYLE_BLOCK.replace_all(&stripped, "");
    convert_line_breaks(&stripped)
}
