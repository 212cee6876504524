//! Encrypted OpenPGP messages
//!
//! A message is session-key packets followed by one encrypted data packet.
//! Public-key session-key packets (PKESK) wrap the session key for a
//! recipient key; symmetric ones (SKESK) derive it from a password.
//!
//! Payloads come from strangers' shares, so a message is checked before any
//! key derivation runs: at most one password packet, a bounded number of
//! session-key packets, and Argon2 cost within [`MAX_ARGON2_MEMORY_EXP`] and
//! [`MAX_ARGON2_PASSES`].

use crate::armor::{self, ArmorKind};
use crate::error::{PipelineError, Result};
use crate::keys::{PrivateKey, PublicKey};
use pgp::composed::{Deserializable, Esk, Message};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::*;
use zeroize::Zeroizing;

/// Password packets tried per message
pub const MAX_PASSWORD_PACKETS: usize = 1;
/// Session-key packets of any kind per message
pub const MAX_SESSION_KEY_PACKETS: usize = 32;
/// Argon2 memory as a power of two in KiB: 2^20 KiB is 1 GiB
pub const MAX_ARGON2_MEMORY_EXP: u8 = 20;
pub const MAX_ARGON2_PASSES: u8 = 16;

const CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

fn encryption_error(e: pgp::errors::Error) -> PipelineError {
    PipelineError::EncryptionFailed(e.to_string())
}

fn check_s2k(s2k: &StringToKey) -> Result<()> {
    if let StringToKey::Argon2 { t, m_enc, .. } = s2k {
        if *m_enc > MAX_ARGON2_MEMORY_EXP {
            return Err(PipelineError::parse(format!(
                "Argon2 memory 2^{m_enc} KiB exceeds the 2^{MAX_ARGON2_MEMORY_EXP} KiB limit"
            )));
        }
        if *t > MAX_ARGON2_PASSES {
            return Err(PipelineError::parse(format!(
                "Argon2 passes {t} exceed the limit of {MAX_ARGON2_PASSES}"
            )));
        }
    }
    Ok(())
}

/// A parsed, size-checked encrypted message. Holds ciphertext only.
#[derive(Debug, Clone)]
pub struct EncryptedMessage {
    inner: Message,
}

impl EncryptedMessage {
    /// Parse an armored message and check its session-key packets
    pub fn from_armored(text: &str) -> Result<Self> {
        armor::expect_kind(text, ArmorKind::Message)?;
        let (inner, _headers) = Message::from_string(text)
            .map_err(|e| PipelineError::parse(format!("invalid message: {e}")))?;
        Self::from_message(inner)
    }

    fn from_message(inner: Message) -> Result<Self> {
        let esk = match &inner {
            Message::Encrypted { esk, .. } => esk,
            _ => return Err(PipelineError::parse("message is not encrypted")),
        };

        if esk.is_empty() {
            return Err(PipelineError::parse("message has no session-key packet"));
        }
        if esk.len() > MAX_SESSION_KEY_PACKETS {
            return Err(PipelineError::parse(format!(
                "message has {} session-key packets (limit {MAX_SESSION_KEY_PACKETS})",
                esk.len()
            )));
        }

        let mut passwords = 0;
        for packet in esk {
            if let Esk::SymKeyEncryptedSessionKey(skesk) = packet {
                passwords += 1;
                check_s2k(skesk.s2k())?;
            }
        }
        if passwords > MAX_PASSWORD_PACKETS {
            return Err(PipelineError::parse(format!(
                "message has {passwords} password packets (limit {MAX_PASSWORD_PACKETS})"
            )));
        }

        Ok(Self { inner })
    }

    fn session_keys(&self) -> &[Esk] {
        match &self.inner {
            Message::Encrypted { esk, .. } => esk,
            _ => &[],
        }
    }

    /// Whether any session key is wrapped to a public key
    pub fn is_key_encrypted(&self) -> bool {
        self.session_keys()
            .iter()
            .any(|packet| matches!(packet, Esk::PublicKeyEncryptedSessionKey(_)))
    }

    pub fn has_password_packet(&self) -> bool {
        self.session_keys()
            .iter()
            .any(|packet| matches!(packet, Esk::SymKeyEncryptedSessionKey(_)))
    }

    /// Encrypt under a password (iterated and salted S2K, AES-256)
    pub fn encrypt_with_password(plaintext: &str, password: &str) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let s2k = StringToKey::new_default(&mut rng);
        let password = Zeroizing::new(password.to_owned());
        let inner = Message::new_literal("", plaintext)
            .encrypt_with_password_seipdv1(&mut rng, s2k, CIPHER, move || password.to_string())
            .map_err(encryption_error)?;
        Ok(Self { inner })
    }

    /// Encrypt to a recipient's encryption-capable key
    pub fn encrypt_to_key(plaintext: &str, key: &PublicKey) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let literal = Message::new_literal("", plaintext);
        let signed = key.signed();

        let inner = match signed.public_subkeys.iter().find(|sub| sub.is_encryption_key()) {
            Some(subkey) => literal.encrypt_to_keys_seipdv1(&mut rng, CIPHER, &[subkey]),
            None if signed.is_encryption_key() => {
                literal.encrypt_to_keys_seipdv1(&mut rng, CIPHER, &[signed])
            }
            None => {
                return Err(PipelineError::precondition(
                    "public key has no encryption-capable key",
                ))
            }
        }
        .map_err(encryption_error)?;
        Ok(Self { inner })
    }

    /// Decrypt with a password. Any failure is `DecryptionFailed`.
    pub fn decrypt_with_password(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        let password = Zeroizing::new(password.to_owned());
        let decrypted = self
            .inner
            .decrypt_with_password(move || password.to_string())
            .map_err(|e| {
                log::debug!("password decryption failed: {e}");
                PipelineError::DecryptionFailed
            })?;
        literal_content(&decrypted)
    }

    /// Decrypt with a private key, unlocking it with `passphrase`
    pub fn decrypt_with_key(
        &self,
        key: &PrivateKey,
        passphrase: Option<&str>,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let passphrase = Zeroizing::new(passphrase.unwrap_or_default().to_owned());
        let (decrypted, _key_ids) = self
            .inner
            .decrypt(move || passphrase.to_string(), &[key.signed()])
            .map_err(|e| {
                log::debug!("key decryption failed: {e}");
                PipelineError::DecryptionFailed
            })?;
        literal_content(&decrypted)
    }

    pub fn to_armored(&self) -> Result<String> {
        self.inner
            .to_armored_string(Default::default())
            .map_err(encryption_error)
    }
}

fn literal_content(message: &Message) -> Result<Zeroizing<Vec<u8>>> {
    match message.get_content() {
        Ok(Some(content)) => Ok(Zeroizing::new(content)),
        Ok(None) => Err(PipelineError::DecryptionFailed),
        Err(e) => {
            log::debug!("decrypted message is unreadable: {e}");
            Err(PipelineError::DecryptionFailed)
        }
    }
}
