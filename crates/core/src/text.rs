//! Decoding for trivia payloads.

use std::borrow::Cow;

/// Percent-decode, then resolve HTML entities.
///
/// Trivia text arrives RFC 3986 encoded and may still carry entities such as
/// `&quot;` once decoded. Invalid UTF-8 after percent-decoding keeps the raw text.
#[must_use]
pub fn decode_text(raw: &str) -> String {
    let percent_decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    html_escape::decode_html_entities(&percent_decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_percent_then_entities() {
        assert_eq!(decode_text("What%20is%202%2B2%3F"), "What is 2+2?");
        assert_eq!(decode_text("%26quot%3BHi%26quot%3B"), "\"Hi\"");
        assert_eq!(decode_text("Caf%C3%A9"), "Café");
        assert_eq!(decode_text("Tom &amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn invalid_utf8_keeps_raw() {
        assert_eq!(decode_text("%FF"), "%FF");
    }
}
