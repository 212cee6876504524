//! OpenPGP key pairs
//!
//! Keys are ordinary transferable OpenPGP keys, so anything GnuPG or
//! OpenPGP.js exports works here and generated keys work there. Messages are
//! encrypted to the first encryption-capable subkey, or to the primary key
//! when it can encrypt itself.

use crate::armor::{self, ArmorKind};
use crate::error::{PipelineError, Result};
use pgp::composed::{
    Deserializable, KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedSecretKey,
    SubkeyParamsBuilder,
};
use pgp::crypto::ecc_curve::ECCCurve;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::*;
use smallvec::smallvec;
use zeroize::Zeroizing;

/// User id put on generated keys
pub const GENERATED_USER_ID: &str = "Seed Parts <seedparts@localhost>";

fn parse_error(what: &str) -> impl FnOnce(pgp::errors::Error) -> PipelineError + '_ {
    move |e| PipelineError::parse(format!("invalid {what}: {e}"))
}

fn keygen_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::EncryptionFailed(format!("key generation failed: {e}"))
}

fn fingerprint_hex(key: &impl PublicKeyTrait) -> String {
    hex::encode_upper(key.fingerprint().as_bytes())
}

/// A recipient's public key
#[derive(Debug, Clone)]
pub struct PublicKey {
    inner: SignedPublicKey,
}

impl PublicKey {
    /// Parse and self-verify an armored public key block
    pub fn from_armored(text: &str) -> Result<Self> {
        armor::expect_kind(text, ArmorKind::PublicKey)?;
        let (inner, _headers) =
            SignedPublicKey::from_string(text.trim()).map_err(parse_error("public key"))?;
        inner.verify().map_err(parse_error("public key"))?;
        Ok(Self { inner })
    }

    /// Uppercase hex fingerprint of the primary key, as shown to users
    pub fn fingerprint_hex(&self) -> String {
        fingerprint_hex(&self.inner)
    }

    pub fn can_encrypt(&self) -> bool {
        self.inner.is_encryption_key()
            || self
                .inner
                .public_subkeys
                .iter()
                .any(|sub| sub.is_encryption_key())
    }

    pub(crate) fn signed(&self) -> &SignedPublicKey {
        &self.inner
    }
}

/// A private key as imported, possibly still locked
pub struct PrivateKey {
    inner: SignedSecretKey,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("fingerprint", &self.fingerprint_hex())
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl PrivateKey {
    pub fn from_armored(text: &str) -> Result<Self> {
        armor::expect_kind(text, ArmorKind::PrivateKey)?;
        let (inner, _headers) =
            SignedSecretKey::from_string(text.trim()).map_err(parse_error("private key"))?;
        inner.verify().map_err(parse_error("private key"))?;
        Ok(Self { inner })
    }

    pub fn fingerprint_hex(&self) -> String {
        fingerprint_hex(&self.inner)
    }

    /// Whether any secret part needs a passphrase before use
    pub fn is_locked(&self) -> bool {
        self.inner.primary_key.secret_params().is_encrypted()
            || self
                .inner
                .secret_subkeys
                .iter()
                .any(|sub| sub.key.secret_params().is_encrypted())
    }

    pub(crate) fn signed(&self) -> &SignedSecretKey {
        &self.inner
    }
}

/// Freshly generated, armored key pair
pub struct GeneratedKeyPair {
    pub public_armored: String,
    pub private_armored: Zeroizing<String>,
    pub fingerprint: String,
}

impl std::fmt::Debug for GeneratedKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedKeyPair")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Generate an OpenPGP key: ECDSA P-256 primary, Curve25519 ECDH subkey
///
/// With a non-empty passphrase both secret parts are locked under it;
/// otherwise the private key block holds them in the clear.
pub fn generate_key_pair(passphrase: Option<&str>) -> Result<GeneratedKeyPair> {
    let passphrase = passphrase.filter(|p| !p.is_empty()).map(str::to_owned);
    let mut rng = rand::thread_rng();

    let subkey = SubkeyParamsBuilder::default()
        .key_type(KeyType::ECDH(ECCCurve::Curve25519))
        .can_encrypt(true)
        .passphrase(passphrase.clone())
        .build()
        .map_err(keygen_error)?;

    let mut builder = SecretKeyParamsBuilder::default();
    builder
        .key_type(KeyType::ECDSA(ECCCurve::P256))
        .can_certify(true)
        .can_sign(true)
        .primary_user_id(GENERATED_USER_ID.into())
        .passphrase(passphrase.clone())
        .preferred_symmetric_algorithms(smallvec![SymmetricKeyAlgorithm::AES256])
        .subkey(subkey);
    let params = builder.build().map_err(keygen_error)?;

    let key_pw = {
        let passphrase = Zeroizing::new(passphrase.unwrap_or_default());
        move || passphrase.to_string()
    };
    let secret = params
        .generate(&mut rng)
        .map_err(keygen_error)?
        .sign(&mut rng, key_pw.clone())
        .map_err(keygen_error)?;
    let public = secret
        .public_key()
        .sign(&mut rng, &secret, key_pw)
        .map_err(keygen_error)?;

    let pair = GeneratedKeyPair {
        public_armored: public
            .to_armored_string(Default::default())
            .map_err(keygen_error)?,
        private_armored: Zeroizing::new(
            secret
                .to_armored_string(Default::default())
                .map_err(keygen_error)?,
        ),
        fingerprint: fingerprint_hex(&public),
    };
    log::debug!("generated key {}", pair.fingerprint);
    Ok(pair)
}
