//! Credentials and key validation
//!
//! Credentials are passed into each call and dropped when it returns.
//! Validation only inspects key blocks; it never unlocks anything.

use crate::error::Result;
use crate::keys::{PrivateKey, PublicKey};
use zeroize::Zeroizing;

/// What the encrypt side may be given
#[derive(Clone)]
pub enum Credential {
    Password(Zeroizing<String>),
    /// Armored public key block
    PublicKey(String),
}

impl Credential {
    pub fn password(password: impl Into<String>) -> Self {
        Self::Password(Zeroizing::new(password.into()))
    }

    pub fn public_key(armored: impl Into<String>) -> Self {
        Self::PublicKey(armored.into())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Credential::Password(..)"),
            Self::PublicKey(_) => f.write_str("Credential::PublicKey(..)"),
        }
    }
}

/// An imported private key and, if it is locked, its passphrase
#[derive(Clone)]
pub struct PrivateKeyCredential {
    pub armored_key: Zeroizing<String>,
    /// As reported by [`validate_private_key`] at import time
    pub passphrase_required: bool,
    pub passphrase: Option<Zeroizing<String>>,
}

impl PrivateKeyCredential {
    /// Build from an armored key, filling in `passphrase_required`
    pub fn import(armored_key: impl Into<String>) -> Result<Self> {
        let armored_key = Zeroizing::new(armored_key.into());
        let info = validate_private_key(&armored_key)?;
        Ok(Self {
            armored_key,
            passphrase_required: info.passphrase_required,
            passphrase: None,
        })
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    pub(crate) fn passphrase(&self) -> Option<&str> {
        self.passphrase
            .as_ref()
            .map(|p| p.as_str())
            .filter(|p| !p.is_empty())
    }
}

impl std::fmt::Debug for PrivateKeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyCredential")
            .field("passphrase_required", &self.passphrase_required)
            .field("has_passphrase", &self.passphrase.is_some())
            .finish_non_exhaustive()
    }
}

/// What the decrypt side may be given
#[derive(Clone)]
pub enum DecryptionCredential {
    Password(Zeroizing<String>),
    PrivateKey(PrivateKeyCredential),
}

impl DecryptionCredential {
    pub fn password(password: impl Into<String>) -> Self {
        Self::Password(Zeroizing::new(password.into()))
    }
}

impl std::fmt::Debug for DecryptionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password(_) => f.write_str("DecryptionCredential::Password(..)"),
            Self::PrivateKey(key) => f
                .debug_tuple("DecryptionCredential::PrivateKey")
                .field(key)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKeyInfo {
    pub fingerprint: String,
    pub passphrase_required: bool,
}

/// Check that text is a well-formed public key block
pub fn validate_public_key(armored: &str) -> Result<PublicKeyInfo> {
    let key = PublicKey::from_armored(armored)?;
    Ok(PublicKeyInfo {
        fingerprint: key.fingerprint_hex(),
    })
}

/// Check that text is a well-formed private key block and report whether
/// it is passphrase-locked
pub fn validate_private_key(armored: &str) -> Result<PrivateKeyInfo> {
    let key = PrivateKey::from_armored(armored)?;
    Ok(PrivateKeyInfo {
        fingerprint: key.fingerprint_hex(),
        passphrase_required: key.is_locked(),
    })
}
