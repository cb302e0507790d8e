//! Hex token parsing and rendering.
//!
//! Input tokens are case-insensitive two-digit bytes; rendering is always
//! uppercase, zero-padded and space-joined.

use std::fmt::Write as _;

use crate::error::{FrameError, Result};

/// Parse a single two-digit hex token into a byte.
pub fn parse_token(token: &str) -> Result<u8> {
    let invalid = || FrameError::InvalidToken {
        token: token.to_string(),
    };
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u8::from_str_radix(token, 16).map_err(|_| invalid())
}

/// Parse a sequence of hex tokens.
pub fn parse_tokens<'a, I>(tokens: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().map(parse_token).collect()
}

/// Parse whitespace-separated hex tokens.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    parse_tokens(text.split_whitespace())
}

/// Render bytes as uppercase, space-joined hex tokens.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case() {
        assert_eq!(parse_token("fb").unwrap(), 0xFB);
        assert_eq!(parse_token("0C").unwrap(), 0x0C);
        assert_eq!(parse_hex("55 aa 01").unwrap(), vec![0x55, 0xAA, 0x01]);
    }

    #[test]
    fn rejects_bad_tokens() {
        for token in ["", "5", "123", "G1", "+1", "0x"] {
            let err = parse_token(token).unwrap_err();
            assert!(matches!(err, FrameError::InvalidToken { .. }), "{token}");
        }
    }

    #[test]
    fn formats_zero_padded_uppercase() {
        assert_eq!(format_hex(&[0x05, 0xFB, 0x00]), "05 FB 00");
        assert_eq!(format_hex(&[]), "");
    }
}
