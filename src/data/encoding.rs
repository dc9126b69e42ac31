use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, warn};

// ---------------------------------------------------------------------------
// Text encodings tried by the loader
// ---------------------------------------------------------------------------

/// A candidate text encoding for the raw source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    /// Windows code page 1252 (WHATWG mapping).
    Windows1252,
    /// Terminal fallback: UTF-8 with invalid sequences replaced.
    Utf8Lossy,
}

/// Encodings attempted in order before the lossy fallback.
pub const FALLBACK_CHAIN: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Utf8Lossy => "utf-8 (lossy)",
        };
        f.write_str(name)
    }
}

/// Input rejected by a strict decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    pub encoding: TextEncoding,
    /// Length of the longest valid prefix, when the decoder reports one.
    pub valid_up_to: Option<usize>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.valid_up_to {
            Some(offset) => write!(f, "invalid {} byte at offset {offset}", self.encoding),
            None => write!(f, "input is not valid {}", self.encoding),
        }
    }
}

impl std::error::Error for DecodeError {}

impl TextEncoding {
    /// Strictly decode `bytes`. Borrows when the input is already valid UTF-8.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
        match self {
            TextEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(DecodeError {
                    encoding: *self,
                    valid_up_to: Some(Encoding::utf8_valid_up_to(bytes)),
                }),
            TextEncoding::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes)),
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(DecodeError {
                    encoding: *self,
                    valid_up_to: None,
                }),
            TextEncoding::Utf8Lossy => Ok(UTF_8.decode_with_bom_removal(bytes).0),
        }
    }
}

/// Decode with the first encoding in [`FALLBACK_CHAIN`] that accepts every
/// byte; if none does, decode lossily. Never fails.
pub fn decode_with_fallback(bytes: &[u8]) -> (Cow<'_, str>, TextEncoding) {
    for encoding in FALLBACK_CHAIN {
        match encoding.decode(bytes) {
            Ok(text) => return (text, encoding),
            Err(e) => debug!("decode attempt rejected: {e}"),
        }
    }
    warn!("no strict encoding matched; decoding as utf-8 with replacement");
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        debug!("replaced undecodable sequences with U+FFFD");
    }
    (text, TextEncoding::Utf8Lossy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_borrows_valid_input() {
        let (text, enc) = decode_with_fallback("Café".as_bytes());
        assert_eq!(enc, TextEncoding::Utf8);
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "Café");
    }

    #[test]
    fn latin1_picks_up_invalid_utf8() {
        // "Café" in ISO-8859-1
        let bytes = [0x43, 0x61, 0x66, 0xE9];
        let (text, enc) = decode_with_fallback(&bytes);
        assert_eq!(enc, TextEncoding::Latin1);
        assert_eq!(text, "Café");
    }

    #[test]
    fn latin1_keeps_c1_bytes_as_code_points() {
        let text = TextEncoding::Latin1.decode(&[b'a', 0x93, 0xFF]).unwrap();
        assert_eq!(text, "a\u{93}\u{FF}");
    }

    #[test]
    fn windows_1252_maps_smart_quotes() {
        let bytes = [0x93, b'h', b'i', 0x94, 0x80];
        let text = TextEncoding::Windows1252.decode(&bytes).unwrap();
        assert_eq!(text, "\u{201C}hi\u{201D}\u{20AC}");
    }

    #[test]
    fn utf8_error_reports_offset() {
        let err = TextEncoding::Utf8.decode(&[b'o', b'k', 0xFF]).unwrap_err();
        assert_eq!(err.encoding, TextEncoding::Utf8);
        assert_eq!(err.valid_up_to, Some(2));
        assert_eq!(err.to_string(), "invalid utf-8 byte at offset 2");
    }

    #[test]
    fn lossy_never_fails() {
        let text = TextEncoding::Utf8Lossy.decode(&[b'a', 0xFF, b'b']).unwrap();
        assert_eq!(text, "a\u{FFFD}b");
    }
}
