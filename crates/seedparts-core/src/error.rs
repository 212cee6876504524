//! Error taxonomy for the secret pipeline
//!
//! Everything except [`PipelineError::PreconditionViolation`] is something a
//! user can fix by supplying different input: more shares, another file, the
//! right password.

use seedparts_shamir::ShamirError;
use std::fmt;
use thiserror::Error;

/// Which credential a caller has to ask the user for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Password,
    PublicKey,
    PrivateKey,
    Passphrase,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Password => "password",
            Self::PublicKey => "public key",
            Self::PrivateKey => "private key",
            Self::Passphrase => "private key passphrase",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The caller broke a contract (bad threshold, empty secret, missing
    /// encryption credential).
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
    /// Malformed armored message or key material
    #[error("Invalid input: {0}")]
    Parse(String),
    #[error("A {0} is required")]
    MissingCredential(CredentialKind),
    /// Wrong password, wrong key or damaged ciphertext. Deliberately carries
    /// no detail.
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Insufficient or invalid shares: {0}")]
    Combine(ShamirError),
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    /// The worker running the operation went away before finishing
    #[error("Operation interrupted: {0}")]
    Interrupted(String),
}

impl PipelineError {
    /// False only for caller bugs
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::PreconditionViolation(_))
    }

    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolation(msg.into())
    }
}

impl From<ShamirError> for PipelineError {
    fn from(err: ShamirError) -> Self {
        if err.is_precondition() {
            Self::PreconditionViolation(err.to_string())
        } else {
            Self::Combine(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
