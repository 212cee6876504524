//! Encryption strategies applied before a secret is split
//!
//! Every strategy yields text, so whatever comes out can be split and pasted
//! like any other payload. Encryption never needs private key material.

use crate::credential::Credential;
use crate::error::{PipelineError, Result};
use crate::keys::PublicKey;
use crate::message::EncryptedMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which strategy produced (or has to undo) a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionType {
    #[default]
    None,
    Password,
    Key,
}

impl EncryptionType {
    pub const ALL: [EncryptionType; 3] = [Self::None, Self::Password, Self::Key];

    /// Human-readable name for menus and exports
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "No encryption",
            Self::Password => "Password",
            Self::Key => "Key Pair",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Password => "password",
            Self::Key => "key",
        }
    }
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "password" => Ok(Self::Password),
            "key" => Ok(Self::Key),
            other => Err(PipelineError::parse(format!(
                "unknown encryption type '{other}' (expected none, password or key)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionStrategy {
    /// Identity: the secret is split as is
    None,
    /// OpenPGP message with a password-derived session key
    Password,
    /// OpenPGP message with the session key wrapped to a recipient key
    PublicKey,
}

impl EncryptionStrategy {
    pub fn for_type(encryption: EncryptionType) -> Self {
        match encryption {
            EncryptionType::None => Self::None,
            EncryptionType::Password => Self::Password,
            EncryptionType::Key => Self::PublicKey,
        }
    }

    pub fn encryption_type(&self) -> EncryptionType {
        match self {
            Self::None => EncryptionType::None,
            Self::Password => EncryptionType::Password,
            Self::PublicKey => EncryptionType::Key,
        }
    }

    /// Turn a secret into the text that gets split
    ///
    /// # Errors
    /// * `PreconditionViolation` - empty secret (password), or a missing,
    ///   empty or wrong kind of credential
    /// * `Parse` - the public key block is malformed
    pub fn encrypt(&self, secret: &str, credential: Option<&Credential>) -> Result<String> {
        match self {
            Self::None => Ok(secret.to_string()),
            Self::Password => {
                if secret.is_empty() {
                    return Err(PipelineError::precondition("Secret cannot be empty"));
                }
                let password = match credential {
                    Some(Credential::Password(p)) if !p.is_empty() => p,
                    _ => return Err(PipelineError::precondition("Password cannot be empty")),
                };
                let message = EncryptedMessage::encrypt_with_password(secret, password)?;
                log::debug!("encrypted {} bytes with a password", secret.len());
                message.to_armored()
            }
            Self::PublicKey => {
                let armored = match credential {
                    Some(Credential::PublicKey(k)) if !k.trim().is_empty() => k,
                    _ => return Err(PipelineError::precondition("Public key cannot be empty")),
                };
                let key = PublicKey::from_armored(armored.trim())?;
                let message = EncryptedMessage::encrypt_to_key(secret, &key)?;
                log::debug!(
                    "encrypted {} bytes to key {}",
                    secret.len(),
                    key.fingerprint_hex()
                );
                message.to_armored()
            }
        }
    }
}
