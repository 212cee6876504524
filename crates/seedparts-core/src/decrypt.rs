//! Decryption resolver
//!
//! Decides what a combined payload is and undoes its encryption:
//!
//! 1. Inspect: no armor marker means the payload is the secret.
//! 2. Classify: a public-key session-key packet means a private key is
//!    needed, otherwise a password.
//! 3. Decrypt with the caller's credential.
//!
//! Classification is pure and cheap, so callers may rerun it every time
//! their share list changes. Nothing is remembered between calls.

use crate::armor::is_armored_message;
use crate::credential::{DecryptionCredential, PrivateKeyCredential};
use crate::error::{CredentialKind, PipelineError, Result};
use crate::keys::PrivateKey;
use crate::message::EncryptedMessage;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Plaintext,
    PasswordEncrypted,
    KeyEncrypted,
}

impl Classification {
    /// Credential a caller has to collect, if any
    pub fn required_credential(&self) -> Option<CredentialKind> {
        match self {
            Self::Plaintext => None,
            Self::PasswordEncrypted => Some(CredentialKind::Password),
            Self::KeyEncrypted => Some(CredentialKind::PrivateKey),
        }
    }
}

/// A recovered secret and how it was protected
pub struct Recovered {
    pub secret: Zeroizing<String>,
    pub classification: Classification,
}

impl std::fmt::Debug for Recovered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recovered")
            .field("classification", &self.classification)
            .finish_non_exhaustive()
    }
}

fn armored_text(payload: &[u8]) -> Result<&str> {
    std::str::from_utf8(payload).map_err(|_| PipelineError::parse("message is not valid text"))
}

fn into_text(bytes: Zeroizing<Vec<u8>>) -> Result<Zeroizing<String>> {
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| PipelineError::parse("secret is not valid UTF-8"))?;
    Ok(Zeroizing::new(text.to_owned()))
}

/// Classify a combined payload without any credential
pub fn classify(payload: &[u8]) -> Result<Classification> {
    if !is_armored_message(payload) {
        return Ok(Classification::Plaintext);
    }
    let message = EncryptedMessage::from_armored(armored_text(payload)?)?;
    Ok(if message.is_key_encrypted() {
        Classification::KeyEncrypted
    } else {
        Classification::PasswordEncrypted
    })
}

/// Decrypt a password-protected message
///
/// # Errors
/// * `MissingCredential(Password)` - empty password
/// * `Parse` - not a well-formed message
/// * `DecryptionFailed` - wrong password or damaged message
pub fn decrypt_with_password(armored: &str, password: &str) -> Result<Zeroizing<String>> {
    if password.is_empty() {
        return Err(PipelineError::MissingCredential(CredentialKind::Password));
    }
    let message = EncryptedMessage::from_armored(armored)?;
    into_text(message.decrypt_with_password(password)?)
}

/// Decrypt a message addressed to a private key
///
/// A locked key without passphrase is `MissingCredential(Passphrase)`,
/// whatever the credential's flag says. A wrong passphrase, a wrong key and
/// a damaged message are all `DecryptionFailed`.
pub fn decrypt_with_key(armored: &str, credential: &PrivateKeyCredential) -> Result<Zeroizing<String>> {
    let message = EncryptedMessage::from_armored(armored)?;

    if credential.armored_key.trim().is_empty() {
        return Err(PipelineError::MissingCredential(CredentialKind::PrivateKey));
    }
    let passphrase = credential.passphrase();
    if credential.passphrase_required && passphrase.is_none() {
        return Err(PipelineError::MissingCredential(CredentialKind::Passphrase));
    }

    let key = PrivateKey::from_armored(&credential.armored_key)?;
    if key.is_locked() && passphrase.is_none() {
        return Err(PipelineError::MissingCredential(CredentialKind::Passphrase));
    }
    into_text(message.decrypt_with_key(&key, passphrase)?)
}

/// Inspect, classify and decrypt a combined payload
///
/// A credential of the wrong class is treated as no credential at all.
pub fn resolve(payload: &[u8], credential: Option<&DecryptionCredential>) -> Result<Recovered> {
    let classification = classify(payload)?;
    log::debug!("payload classified as {classification:?}");

    let secret = match (classification, credential) {
        (Classification::Plaintext, _) => into_text(Zeroizing::new(payload.to_vec()))?,
        (Classification::PasswordEncrypted, Some(DecryptionCredential::Password(password))) => {
            decrypt_with_password(armored_text(payload)?, password)?
        }
        (Classification::KeyEncrypted, Some(DecryptionCredential::PrivateKey(key))) => {
            decrypt_with_key(armored_text(payload)?, key)?
        }
        (needs, _) => {
            let kind = needs
                .required_credential()
                .unwrap_or(CredentialKind::Password);
            return Err(PipelineError::MissingCredential(kind));
        }
    };

    Ok(Recovered {
        secret,
        classification,
    })
}
