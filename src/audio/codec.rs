//! Base64 transport encoding for audio payloads.
//!
//! The remote API carries binary audio in both directions as base64 text:
//! input recordings are inlined into requests, synthesized speech comes
//! back the same way. Both directions use the STANDARD alphabet with padding.

use crate::error::{Result, VocapError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Decode a base64 string into raw bytes.
///
/// # Errors
/// Returns `VocapError::Decode` if the input contains characters outside
/// the base64 alphabet or has invalid padding.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    STANDARD.decode(text).map_err(|e| VocapError::Decode {
        message: format!("invalid base64 payload: {}", e),
    })
}

/// Encode raw bytes as a base64 string.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_known_payload() {
        // "AAAB/w==" is the 4-byte sequence 00 00 01 ff
        let bytes = decode_base64("AAAB/w==").unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x01, 0xFF]);
    }

    #[test]
    fn decode_empty_string_yields_empty_bytes() {
        assert_eq!(decode_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn round_trip_arbitrary_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let encoded = encode_base64(&bytes);
        assert_eq!(decode_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn round_trip_odd_lengths() {
        for len in 0..8 {
            let bytes = vec![0xA5u8; len];
            assert_eq!(decode_base64(&encode_base64(&bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn decode_rejects_non_alphabet_characters() {
        let result = decode_base64("AAA!");
        match result {
            Err(VocapError::Decode { message }) => {
                assert!(message.contains("invalid base64"), "got: {}", message);
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_invalid_padding() {
        // A lone trailing character cannot form a full byte
        assert!(decode_base64("AAAAA").is_err());
    }

    #[test]
    fn decode_rejects_embedded_whitespace() {
        assert!(decode_base64("AA AA").is_err());
    }
}
