//! Seed Parts Core
//!
//! The secret lifecycle around Shamir splitting: encrypt a secret, split it,
//! and later combine shares, work out how the payload is protected and
//! decrypt it.
//!
//! # Encryption
//!
//! [`EncryptionStrategy`] is `None`, `Password` or `PublicKey`. Encrypted
//! output is an ASCII-armored OpenPGP message starting with
//! [`MESSAGE_HEADER`], readable by GnuPG and OpenPGP.js. Keys are ordinary
//! OpenPGP key blocks.
//!
//! # Decryption
//!
//! [`classify`] needs no credential. [`resolve`] classifies and decrypts,
//! asking for the right credential via [`PipelineError::MissingCredential`].
//!
//! # Example
//!
//! ```
//! use seedparts_core::{resolve, Credential, DecryptionCredential, EncryptionStrategy,
//!     Classification};
//! use seedparts_shamir::{combine_shares, split_secret, ThresholdParams};
//!
//! let strategy = EncryptionStrategy::Password;
//! let armored = strategy.encrypt("top secret", Some(&Credential::password("hunter2"))).unwrap();
//!
//! let shares = split_secret(armored.as_bytes(), &ThresholdParams::three_of_five()).unwrap();
//! let payload = combine_shares(&shares[..3]).unwrap();
//!
//! let recovered = resolve(&payload, Some(&DecryptionCredential::password("hunter2"))).unwrap();
//! assert_eq!(recovered.classification, Classification::PasswordEncrypted);
//! assert_eq!(recovered.secret.as_str(), "top secret");
//! ```

pub mod armor;
pub mod credential;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keys;
pub mod message;
pub mod pipeline;
pub mod secret;

pub use armor::{is_armored_message, MESSAGE_HEADER};
pub use credential::{
    validate_private_key, validate_public_key, Credential, DecryptionCredential,
    PrivateKeyCredential, PrivateKeyInfo, PublicKeyInfo,
};
pub use decrypt::{classify, decrypt_with_key, decrypt_with_password, resolve, Classification, Recovered};
pub use encrypt::{EncryptionStrategy, EncryptionType};
pub use error::{CredentialKind, PipelineError, Result};
pub use keys::{generate_key_pair, GeneratedKeyPair};
pub use message::EncryptedMessage;
pub use pipeline::{Supersession, Ticket};
pub use secret::{
    compose_secret, language_from_name, language_name, Language, SecretType, SeedPhrase,
    LANGUAGES,
};
