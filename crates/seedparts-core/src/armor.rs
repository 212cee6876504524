//! OpenPGP ASCII armor framing
//!
//! Only the BEGIN line is looked at here. Decoding the body, checking the
//! CRC and parsing packets is left to `pgp`.
//!
//! A payload counts as an encrypted message exactly when it starts with
//! [`MESSAGE_HEADER`]; no other signal is used.

use crate::error::{PipelineError, Result};

/// First line of every encrypted message
pub const MESSAGE_HEADER: &str = "-----BEGIN PGP MESSAGE-----";

/// Types of armored content this crate accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorKind {
    Message,
    PublicKey,
    PrivateKey,
}

impl ArmorKind {
    pub const ALL: [ArmorKind; 3] = [Self::Message, Self::PublicKey, Self::PrivateKey];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Message => "MESSAGE",
            Self::PublicKey => "PUBLIC KEY BLOCK",
            Self::PrivateKey => "PRIVATE KEY BLOCK",
        }
    }

    pub fn begin_line(&self) -> String {
        format!("-----BEGIN PGP {}-----", self.label())
    }
}

/// Whether a combined payload is an armored encrypted message
pub fn is_armored_message(payload: &[u8]) -> bool {
    payload.starts_with(MESSAGE_HEADER.as_bytes())
}

/// Kind of the first armor block in `text`, ignoring leading blank lines
pub fn detect(text: &str) -> Option<ArmorKind> {
    let first = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    ArmorKind::ALL
        .into_iter()
        .find(|kind| first == kind.begin_line())
}

/// Fail with `Parse` unless `text` is an armor block of the given kind
pub fn expect_kind(text: &str, expected: ArmorKind) -> Result<()> {
    match detect(text) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(PipelineError::parse(format!(
            "expected {}, found {}",
            expected.label().to_lowercase(),
            kind.label().to_lowercase()
        ))),
        None => Err(PipelineError::parse(format!(
            "not an armored {}",
            expected.label().to_lowercase()
        ))),
    }
}
