//! SSML rendering.
//!
//! The document shape is fixed: version, language and voice are compile-time
//! constants, the typed message is the only runtime field. The message is
//! escaped before substitution so that text containing XML metacharacters
//! still produces a well-formed document.

use std::borrow::Cow;

use crate::constants;

/// Renders the synthesis request document around `text`.
pub fn render_message(text: &str) -> String {
    format!(
        "<speak version=\"{}\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{}\"><voice name=\"{}\">{}</voice></speak>",
        constants::SSML_VERSION,
        constants::LANGUAGE,
        constants::VOICE_NAME,
        escape_text(text),
    )
}

/// Escapes the five XML predefined entities. Returns the input unchanged when
/// nothing needs escaping.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
