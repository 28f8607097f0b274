//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use encoding_rs::{Encoding, ISO_8859_15};

/// Decode ISO-8859-15 bytes into a UTF-8 string
///
/// The intranet predates UTF-8 and serves its pages in Latin-9. Every byte
/// maps to a code point, so decoding cannot fail.
pub fn decode_latin9(bytes: &[u8]) -> String {
    let (cow, _encoding, _had_errors) = ISO_8859_15.decode(bytes);
    cow.into_owned()
}

/// Decode a response body, honouring a `charset` in the Content-Type header
///
/// Falls back to ISO-8859-15 when the header names no charset or an unknown one.
pub fn decode_body(bytes: &[u8], content_type: &str) -> String {
    let encoding = charset_from_content_type(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(ISO_8859_15);

    let (cow, _encoding, _had_errors) = encoding.decode(bytes);
    cow.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Mask an identifier for logging, keeping only the last three characters
pub fn mask_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    if chars.len() <= 3 {
        return "*".repeat(chars.len());
    }

    let visible: String = chars[chars.len() - 3..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 3))
}

/// Truncate text to a maximum number of characters
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
