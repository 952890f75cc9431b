//! Reversible transform between the store's base64 wire text and native text/bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

/// Errors produced while decoding wire content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The wire text is not valid standard base64.
    #[error("content is not valid base64: {0}")]
    InvalidBase64(String),
}

/// Decodes base64 wire text into raw bytes.
///
/// ASCII whitespace inside the payload is ignored; the store wraps long payloads across lines.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBase64`] when the payload is not standard base64.
pub fn decode_binary(wire: &str) -> Result<Vec<u8>, CodecError> {
    let compact: String = wire.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|err| CodecError::InvalidBase64(err.to_string()))
}

/// Decodes base64 wire text into native text.
///
/// UTF-8 interpretation is attempted first. Content that is not valid UTF-8 (arbitrary binary)
/// falls back to a byte-for-byte mapping where each byte becomes the code point of equal value,
/// so any syntactically valid payload yields a string.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBase64`] when the payload is not standard base64.
pub fn decode_text(wire: &str) -> Result<String, CodecError> {
    let bytes = decode_binary(wire)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => Ok(err.into_bytes().into_iter().map(char::from).collect()),
    }
}

/// Encodes native text as UTF-8 and then base64.
pub fn encode_text(text: &str) -> String {
    encode_bytes(text.as_bytes())
}

/// Encodes raw bytes as base64 wire text.
pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_through_the_wire_form() {
        for text in ["", "hello", "naïve café", "日本語テキスト", "emoji 🚀\nsecond line"] {
            let wire = encode_text(text);
            assert_eq!(decode_text(&wire).expect("decode"), text, "text={text:?}");
        }
    }

    #[test]
    fn encode_is_left_inverse_for_utf8_payloads() {
        let wire = "aMOpbGxv";
        let decoded = decode_text(wire).expect("decode");
        assert_eq!(decoded, "héllo");
        assert_eq!(encode_text(&decoded), wire);
    }

    #[test]
    fn non_utf8_payloads_fall_back_to_byte_mapping() {
        let wire = encode_bytes(&[0xff, 0xfe, 0x41, 0x00]);
        let decoded = decode_text(&wire).expect("fallback never fails");
        assert_eq!(decoded, "\u{ff}\u{fe}A\u{0}");
    }

    #[test]
    fn line_wrapped_payloads_are_accepted() {
        let wire = "aGVsbG8g\nd29ybGQ=\n";
        assert_eq!(decode_text(wire).expect("decode"), "hello world");
    }

    #[test]
    fn binary_decode_skips_text_interpretation() {
        let bytes = vec![0u8, 159, 146, 150, 255];
        assert_eq!(decode_binary(&encode_bytes(&bytes)).expect("decode"), bytes);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(matches!(
            decode_text("not base64!!"),
            Err(CodecError::InvalidBase64(_))
        ));
    }
}
