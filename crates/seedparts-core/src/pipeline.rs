//! Async entry points
//!
//! Key derivation and key operations are CPU-bound, so each call runs on
//! tokio's blocking pool and the caller simply awaits it. Inputs are moved
//! into the call and dropped when it returns; nothing is cached.
//!
//! When inputs change while an earlier call is still running, wrap the calls
//! in a [`Supersession`] so only the newest result is observed.

use crate::credential::{self, Credential, DecryptionCredential, PrivateKeyInfo, PublicKeyInfo};
use crate::decrypt::{self, Classification, Recovered};
use crate::encrypt::EncryptionStrategy;
use crate::error::{PipelineError, Result};
use crate::keys::{self, GeneratedKeyPair};
use seedparts_shamir::{
    combine_shares, decode_share, encode_share, split_secret, ShamirError, ThresholdParams,
};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use zeroize::Zeroizing;

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(PipelineError::Interrupted(e.to_string())),
    }
}

/// Encrypt a secret with the chosen strategy, then split it into base64 shares
pub async fn create_shares(
    secret: Zeroizing<String>,
    strategy: EncryptionStrategy,
    credential: Option<Credential>,
    params: ThresholdParams,
) -> Result<Vec<String>> {
    blocking(move || {
        params.validate()?;
        let payload = Zeroizing::new(strategy.encrypt(&secret, credential.as_ref())?);
        let shares = split_secret(payload.as_bytes(), &params)?;
        log::info!(
            "created {}-of-{} shares ({})",
            params.threshold,
            params.total_shares,
            strategy.encryption_type()
        );
        Ok(shares.iter().map(encode_share).collect())
    })
    .await
}

/// Decode and combine shares as entered
///
/// Blank entries are skipped. Fewer than two usable shares means there is
/// no payload yet, reported as `Combine(InsufficientShares)`.
pub fn combine_share_texts<S: AsRef<str>>(shares: &[S]) -> Result<Vec<u8>> {
    let decoded = shares
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.trim().is_empty())
        .map(decode_share)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(PipelineError::Combine)?;

    if decoded.len() < 2 {
        return Err(PipelineError::Combine(ShamirError::InsufficientShares));
    }
    Ok(combine_shares(&decoded)?)
}

/// Rebuild the payload from share texts
pub async fn recover_payload(shares: Vec<String>) -> Result<Vec<u8>> {
    blocking(move || combine_share_texts(&shares)).await
}

/// Classify a combined payload
pub async fn classify_payload(payload: Vec<u8>) -> Result<Classification> {
    blocking(move || decrypt::classify(&payload)).await
}

/// Classify and decrypt a combined payload
pub async fn unlock_payload(
    payload: Vec<u8>,
    credential: Option<DecryptionCredential>,
) -> Result<Recovered> {
    let payload = Zeroizing::new(payload);
    blocking(move || decrypt::resolve(&payload, credential.as_ref())).await
}

pub async fn validate_public_key(armored: String) -> Result<PublicKeyInfo> {
    blocking(move || credential::validate_public_key(&armored)).await
}

pub async fn validate_private_key(armored: Zeroizing<String>) -> Result<PrivateKeyInfo> {
    blocking(move || credential::validate_private_key(&armored)).await
}

pub async fn generate_key_pair(passphrase: Option<Zeroizing<String>>) -> Result<GeneratedKeyPair> {
    blocking(move || keys::generate_key_pair(passphrase.as_deref().map(String::as_str))).await
}

/// Handle for one run under a [`Supersession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Last-write-wins guard for recomputed results
///
/// Every [`Supersession::run`] takes a new ticket. When a run finishes, its
/// result is returned only if no newer ticket was issued meanwhile. Stale
/// work is not cancelled; its result is dropped.
#[derive(Debug, Default)]
pub struct Supersession {
    latest: AtomicU64,
}

impl Supersession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        let ticket = self.issue();
        let output = future.await;
        if self.is_current(ticket) {
            Some(output)
        } else {
            log::debug!("discarding superseded result {ticket:?}");
            None
        }
    }
}
