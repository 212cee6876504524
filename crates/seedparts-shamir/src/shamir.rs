//! Core Shamir's Secret Sharing implementation
//!
//! Split a payload into N shares where any T can reconstruct it.

use crate::gf256::{gf_add, gf_mul, lagrange_basis_at_zero, poly_eval};
use crate::{ShamirError, ThresholdParams};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the integrity tag split along with the payload
pub const CHECKSUM_LEN: usize = 4;

/// A single share of a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// x-coordinate (random, never 0)
    pub index: u8,
    /// y-values, one per byte of the tagged payload
    pub data: Vec<u8>,
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(payload);
    let mut tag = [0u8; CHECKSUM_LEN];
    tag.copy_from_slice(&digest[..CHECKSUM_LEN]);
    tag
}

/// Split a payload into shares using Shamir's Secret Sharing
///
/// Every call draws fresh coefficients and fresh x-coordinates, so two splits
/// of the same payload share nothing.
///
/// # Arguments
/// * `secret` - The payload bytes to split (non-empty)
/// * `params` - T-of-N parameters
///
/// # Returns
/// Vector of N shares, any T of which reconstruct the payload
pub fn split_secret(secret: &[u8], params: &ThresholdParams) -> Result<Vec<Share>, ShamirError> {
    params.validate()?;
    if secret.is_empty() {
        return Err(ShamirError::EmptySecret);
    }

    let mut rng = rand::thread_rng();

    let mut xs: Vec<u8> = (1..=255u8).collect();
    xs.shuffle(&mut rng);
    xs.truncate(params.total_shares as usize);

    let framed_len = secret.len() + CHECKSUM_LEN;
    let mut shares: Vec<Share> = xs
        .into_iter()
        .map(|index| Share {
            index,
            data: Vec::with_capacity(framed_len),
        })
        .collect();

    // p(x) = byte + c1*x + ... + c_{t-1}*x^{t-1}
    let mut coefficients = vec![0u8; params.threshold as usize];
    for &byte in secret.iter().chain(checksum(secret).iter()) {
        coefficients[0] = byte;
        rng.fill_bytes(&mut coefficients[1..]);

        for share in &mut shares {
            share.data.push(poly_eval(&coefficients, share.index));
        }
    }
    coefficients.fill(0);

    log::debug!(
        "split {} payload bytes into {}-of-{} shares",
        secret.len(),
        params.threshold,
        params.total_shares
    );
    Ok(shares)
}

/// Reconstruct a payload from shares
///
/// All supplied shares take part in the interpolation, in any order. The
/// result is only returned if its integrity tag checks out.
///
/// # Errors
/// * `InsufficientShares` - fewer than 2 shares
/// * `InvalidShare` - mismatched lengths, zero or duplicate indices
/// * `ChecksumMismatch` - too few shares for the original threshold, shares
///   from different splits, or corrupted data
pub fn combine_shares(shares: &[Share]) -> Result<Vec<u8>, ShamirError> {
    if shares.len() < 2 {
        return Err(ShamirError::InsufficientShares);
    }

    let framed_len = shares[0].data.len();
    if shares.iter().any(|s| s.data.len() != framed_len) {
        return Err(ShamirError::InvalidShare(
            "Shares have different lengths".into(),
        ));
    }
    if framed_len <= CHECKSUM_LEN {
        return Err(ShamirError::InvalidShare("Share is too short".into()));
    }

    let xs: Vec<u8> = shares.iter().map(|s| s.index).collect();
    if xs.contains(&0) {
        return Err(ShamirError::InvalidShare("Share index 0 is invalid".into()));
    }
    let mut sorted = xs.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != xs.len() {
        return Err(ShamirError::InvalidShare("Duplicate share indices".into()));
    }

    let basis = lagrange_basis_at_zero(&xs);

    let mut framed: Vec<u8> = (0..framed_len)
        .map(|pos| {
            shares
                .iter()
                .zip(&basis)
                .fold(0u8, |acc, (share, &b)| gf_add(acc, gf_mul(share.data[pos], b)))
        })
        .collect();

    let payload_len = framed_len - CHECKSUM_LEN;
    let valid = checksum(&framed[..payload_len]) == framed[payload_len..];
    framed.truncate(payload_len);
    if !valid {
        framed.fill(0);
        log::debug!("combined {} shares but integrity tag did not match", shares.len());
        return Err(ShamirError::ChecksumMismatch);
    }

    Ok(framed)
}
