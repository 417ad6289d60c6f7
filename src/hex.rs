//! ASCII hex codec
//!
//! Decoding is strict about the alphabet but tolerant of a dangling odd
//! character, which is dropped. Encoding goes through a [`RenderMode`] so the
//! same byte buffer can be shown as plain hex or in one of the vendor
//! decimal-looking alphabets.

use crate::Error;
use data_encoding::HEXLOWER_PERMISSIVE;

const HEX_SYMBOLS: &[u8; 16] = b"0123456789abcdef";
const DECIMAL_CC_SYMBOLS: &[u8; 16] = b"0123456789012345";
const DECIMAL_SNK_SYMBOLS: &[u8; 16] = b"0123456789222333";
const FRIENDLY_SYMBOLS: &[u8; 16] = b"0123456789ahcpef";

/// Symbol table used when rendering bytes as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Lowercase hexadecimal
    #[default]
    Hex,
    /// Nibbles `a-f` folded onto `0-5`
    DecimalCc,
    /// Nibbles `a-c` shown as `2`, `d-f` as `3`
    DecimalSnk,
    /// Hex with `b` and `d` replaced by `h` and `p`
    Friendly,
}

impl RenderMode {
    /// Per-nibble lookup table for this mode
    #[must_use]
    pub const fn symbols(self) -> &'static [u8; 16] {
        match self {
            Self::Hex => HEX_SYMBOLS,
            Self::DecimalCc => DECIMAL_CC_SYMBOLS,
            Self::DecimalSnk => DECIMAL_SNK_SYMBOLS,
            Self::Friendly => FRIENDLY_SYMBOLS,
        }
    }
}

/// Decode ASCII hex into bytes
///
/// Only `floor(len / 2)` byte pairs are consumed; a trailing odd character is ignored.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] if any consumed character is outside `0-9A-Fa-f`.
/// No partial buffer is returned.
pub fn decode<S: AsRef<[u8]>>(input: S) -> Result<Vec<u8>, Error> {
    let input = input.as_ref();
    let even = &input[..input.len() & !1];

    HEXLOWER_PERMISSIVE
        .decode(even)
        .map_err(|_| Error::DecodeError)
}

/// Render bytes as text, high nibble first, two symbols per byte
#[must_use]
pub fn encode(bytes: &[u8], mode: RenderMode) -> String {
    let table = mode.symbols();
    let mut result = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        result.push(table[usize::from(byte >> 4)] as char);
        result.push(table[usize::from(byte & 0x0f)] as char);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{RenderMode, decode, encode};
    use crate::Error;

    #[test]
    fn decode_then_encode_normalizes_case() {
        let input = "00ff10AbCdEf7a";
        let bytes = decode(input).unwrap();
        assert_eq!(bytes, [0x00, 0xff, 0x10, 0xab, 0xcd, 0xef, 0x7a]);
        assert_eq!(encode(&bytes, RenderMode::Hex), input.to_lowercase());
    }

    #[test]
    fn odd_trailing_character_is_ignored() {
        assert_eq!(decode("abc").unwrap(), [0xab]);
        // even the dangling character is not validated
        assert_eq!(decode("abz").unwrap(), [0xab]);
        assert!(decode("a").unwrap().is_empty());
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert_eq!(decode("0g"), Err(Error::DecodeError));
        assert_eq!(decode("12 4"), Err(Error::DecodeError));
        assert_eq!(decode("0x12"), Err(Error::DecodeError));
    }

    #[test]
    fn vendor_alphabets() {
        let bytes = [0x01, 0x89, 0xab, 0xcd, 0xef];
        assert_eq!(encode(&bytes, RenderMode::Hex), "0189abcdef");
        assert_eq!(encode(&bytes, RenderMode::DecimalCc), "0189012345");
        assert_eq!(encode(&bytes, RenderMode::DecimalSnk), "0189222333");
        assert_eq!(encode(&bytes, RenderMode::Friendly), "0189ahcpef");
    }

    #[test]
    fn empty_input() {
        assert!(decode("").unwrap().is_empty());
        assert_eq!(encode(&[], RenderMode::Hex), "");
    }
}
