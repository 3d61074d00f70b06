//! Embedding - Text-Safe Encodings for the Portable Document
//!
//! Everything that goes into the document passes through here.

use base64::Engine;

/// Prefix of the self-describing URI the brand graphic is inlined as.
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Escape text for a backtick-delimited JS template literal.
///
/// Order matters: backslashes first, so the escapes inserted for
/// backticks and `${` are not themselves escaped again.
pub fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Reverse of [`escape_template_literal`]: same substitutions, reverse order.
pub fn unescape_template_literal(text: &str) -> String {
    text.replace("\\${", "${")
        .replace("\\`", "`")
        .replace("\\\\", "\\")
}

/// Inline an SVG as a base64 data URI. Surrounding whitespace is dropped.
pub fn svg_data_uri(svg: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(svg.trim().as_bytes());
    format!("{}{}", SVG_DATA_URI_PREFIX, encoded)
}

/// HTML entity escaping for label text.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
