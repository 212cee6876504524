//! Seed Parts Shamir Module
//!
//! Split an opaque payload into N shares where any T of them reconstruct it.
//!
//! # Share Layout
//!
//! Each share is the evaluation of one random polynomial per payload byte at
//! a random nonzero x-coordinate. On the wire a share is `data || x`, and for
//! copy/paste it travels as standard base64 text. Neither the threshold nor
//! the share count is stored in a share; whoever splits a secret must tell
//! the recipients how many shares are needed.
//!
//! # Integrity
//!
//! The payload is split together with a short SHA-256 tag. Combining too few
//! shares, shares from different splits, or a corrupted share produces a
//! [`ShamirError::ChecksumMismatch`] instead of a wrong payload.
//!
//! # Example
//!
//! ```
//! use seedparts_shamir::{combine_shares, split_secret, ThresholdParams};
//! use seedparts_shamir::shares::{decode_share, encode_share};
//!
//! let params = ThresholdParams::three_of_five();
//! let shares = split_secret(b"correct horse battery staple", &params).unwrap();
//!
//! // Shares are handed out as base64 text
//! let text: Vec<String> = shares.iter().map(encode_share).collect();
//!
//! // Any 3 of them bring the secret back
//! let picked: Vec<_> = [&text[4], &text[0], &text[2]]
//!     .iter()
//!     .map(|t| decode_share(t).unwrap())
//!     .collect();
//! assert_eq!(combine_shares(&picked).unwrap(), b"correct horse battery staple");
//! ```

pub mod gf256;
pub mod shamir;
pub mod shares;

// Re-exports
pub use shamir::{combine_shares, split_secret, Share, CHECKSUM_LEN};
pub use shares::{decode_share, encode_share};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest share count: x-coordinates are the nonzero elements of GF(256).
pub const MAX_SHARES: u8 = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShamirError {
    #[error("Invalid threshold: need at least 2")]
    InvalidThreshold,
    #[error("Threshold exceeds share count")]
    ThresholdExceedsShares,
    #[error("Cannot split an empty secret")]
    EmptySecret,
    #[error("Not enough shares to reconstruct")]
    InsufficientShares,
    #[error("Invalid share: {0}")]
    InvalidShare(String),
    #[error("Shares do not reconstruct a valid secret")]
    ChecksumMismatch,
}

impl ShamirError {
    /// Whether the error comes from bad split parameters (a caller bug)
    /// rather than from the shares a user supplied.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidThreshold | Self::ThresholdExceedsShares | Self::EmptySecret
        )
    }
}

/// Split parameters: T-of-N
///
/// `total_shares` is a `u8`, so the upper bound of [`MAX_SHARES`] holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Minimum shares needed to reconstruct (T)
    pub threshold: u8,
    /// Total shares to generate (N)
    pub total_shares: u8,
}

impl ThresholdParams {
    /// Build and validate a T-of-N configuration
    pub fn new(total_shares: u8, threshold: u8) -> Result<Self, ShamirError> {
        let params = Self {
            threshold,
            total_shares,
        };
        params.validate()?;
        Ok(params)
    }

    /// Common 2-of-3 setup
    pub fn two_of_three() -> Self {
        Self {
            threshold: 2,
            total_shares: 3,
        }
    }

    /// Common 3-of-5 setup
    pub fn three_of_five() -> Self {
        Self {
            threshold: 3,
            total_shares: 5,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ShamirError> {
        if self.threshold < 2 {
            return Err(ShamirError::InvalidThreshold);
        }
        if self.threshold > self.total_shares {
            return Err(ShamirError::ThresholdExceedsShares);
        }
        Ok(())
    }
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self::three_of_five()
    }
}
