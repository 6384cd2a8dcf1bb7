//! Base64URL encoding/decoding per RFC 4648 §5
//!
//! Thin wrapper around the `base64` crate: URL-safe alphabet, no padding on
//! output, padding and non-canonical trailing bits rejected on input.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encode bytes to a Base64URL string
pub fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode a string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode a Base64URL string to bytes
pub fn decode_bytes(input: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::malformed(format!("Base64URL decode failed: {e}")))
}

/// Decode a Base64URL string to a UTF-8 string
pub fn decode(input: &str) -> Result<String> {
    let bytes = decode_bytes(input)?;
    String::from_utf8(bytes).map_err(|e| Error::malformed(format!("Invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bytes() {
        assert_eq!(encode_bytes(b""), "");
        assert_eq!(encode_bytes(b"f"), "Zg");
        assert_eq!(encode_bytes(b"fo"), "Zm8");
        assert_eq!(encode_bytes(b"foo"), "Zm9v");
        assert_eq!(encode_bytes(b"foob"), "Zm9vYg");
        assert_eq!(encode_bytes(b"fooba"), "Zm9vYmE");
        assert_eq!(encode_bytes(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn test_decode_valid() {
        assert_eq!(decode_bytes("SGVsbG8").unwrap(), b"Hello");
        assert_eq!(decode("Zm9vYmFy").unwrap(), "foobar");
        assert_eq!(decode_bytes("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(decode_bytes("!!!"), Err(Error::MalformedToken(_))));
        // Padded input is standard Base64, not Base64URL
        assert!(decode_bytes("SGVsbG8=").is_err());
        // A single trailing character cannot encode a whole byte
        assert!(decode_bytes("A").is_err());
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let encoded = encode_bytes(&[0xff, 0xfe]);
        assert!(matches!(decode(&encoded), Err(Error::MalformedToken(_))));
    }

    #[test]
    fn test_url_safe_characters() {
        let encoded = encode_bytes(&[0xfb, 0xff]);
        assert!(encoded.contains('-') || encoded.contains('_'));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }
}
