//! Share transport encoding
//!
//! A share travels as `data || index` bytes, and as base64 text wherever a
//! human copies, pastes or exports it.

use crate::shamir::Share;
use crate::ShamirError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Serialize a share to its wire bytes: y-values followed by the x-coordinate
pub fn share_to_bytes(share: &Share) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(share.data.len() + 1);
    bytes.extend_from_slice(&share.data);
    bytes.push(share.index);
    bytes
}

/// Parse wire bytes back into a share
pub fn share_from_bytes(bytes: &[u8]) -> Result<Share, ShamirError> {
    match bytes.split_last() {
        Some((&index, data)) if !data.is_empty() => Ok(Share {
            index,
            data: data.to_vec(),
        }),
        _ => Err(ShamirError::InvalidShare("Share is too short".into())),
    }
}

/// Encode arbitrary bytes as standard base64 text
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard base64 text, ignoring surrounding whitespace
pub fn decode_base64(text: &str) -> Result<Vec<u8>, ShamirError> {
    BASE64
        .decode(text.trim())
        .map_err(|e| ShamirError::InvalidShare(format!("Not valid base64: {e}")))
}

/// Export a share as base64 text
pub fn encode_share(share: &Share) -> String {
    encode_base64(&share_to_bytes(share))
}

/// Parse a share from base64 text (as pasted or read from a file)
pub fn decode_share(text: &str) -> Result<Share, ShamirError> {
    share_from_bytes(&decode_base64(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{split_secret, ThresholdParams};

    #[test]
    fn test_wire_layout_puts_index_last() {
        let share = Share {
            index: 0x2A,
            data: vec![0xDE, 0xAD, 0xBE, 0xEF],
        };
        assert_eq!(hex::encode(share_to_bytes(&share)), "deadbeef2a");
        assert_eq!(encode_share(&share), "3q2+7yo=");
        assert_eq!(decode_share("3q2+7yo=").unwrap(), share);
    }

    #[test]
    fn test_base64_edge_bytes() {
        for bytes in [vec![], vec![0u8; 33], vec![0xFFu8; 33], (0..=255u8).collect()] {
            assert_eq!(decode_base64(&encode_base64(&bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let shares = split_secret(b"pasted from a file", &ThresholdParams::two_of_three()).unwrap();
        let text = format!("  {}\n", encode_share(&shares[0]));
        assert_eq!(decode_share(&text).unwrap(), shares[0]);
    }

    #[test]
    fn test_invalid_text_rejected() {
        assert!(matches!(
            decode_share("not base64!"),
            Err(ShamirError::InvalidShare(_))
        ));
        // One byte decodes, but has no room for data
        assert!(matches!(
            decode_share("Kg=="),
            Err(ShamirError::InvalidShare(_))
        ));
        assert!(matches!(decode_share(""), Err(ShamirError::InvalidShare(_))));
    }
}
