//! Secrets as the user enters them
//!
//! A secret is either free text, or a BIP-39 seed phrase with an optional
//! note. Both end up as one string before encryption.

use crate::error::{PipelineError, Result};
use bip39::Mnemonic;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub use bip39::Language;

/// Word counts BIP-39 defines
pub const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Every BIP-39 word list with the name used on the command line
pub const LANGUAGES: [(&str, Language); 10] = [
    ("english", Language::English),
    ("simplified-chinese", Language::SimplifiedChinese),
    ("traditional-chinese", Language::TraditionalChinese),
    ("czech", Language::Czech),
    ("french", Language::French),
    ("italian", Language::Italian),
    ("japanese", Language::Japanese),
    ("korean", Language::Korean),
    ("portuguese", Language::Portuguese),
    ("spanish", Language::Spanish),
];

/// Look up a word list by its command-line name
pub fn language_from_name(name: &str) -> Option<Language> {
    let name = name.trim().to_lowercase().replace('_', "-");
    LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, language)| language)
}

pub fn language_name(language: Language) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(_, candidate)| *candidate == language)
        .map_or("unknown", |&(name, _)| name)
}

fn normalize_words(words: &str) -> Zeroizing<String> {
    Zeroizing::new(
        words
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    SeedPhrase,
    Data,
}

/// A checksummed BIP-39 mnemonic in any of the standard word lists
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase {
    mnemonic: Mnemonic,
}

impl SeedPhrase {
    /// Parse space-separated words, detecting the word list.
    ///
    /// Case and extra whitespace are ignored. A phrase whose words appear in
    /// more than one list is rejected; use [`SeedPhrase::parse_in`] for it.
    pub fn parse(words: &str) -> Result<Self> {
        let normalized = normalize_words(words);
        let mnemonic = Mnemonic::parse(normalized.as_str())
            .map_err(|e| PipelineError::parse(format!("Invalid seed phrase: {e}")))?;
        Ok(Self { mnemonic })
    }

    /// Parse against one word list
    pub fn parse_in(language: Language, words: &str) -> Result<Self> {
        let normalized = normalize_words(words);
        let mnemonic = Mnemonic::parse_in(language, normalized.as_str()).map_err(|e| {
            PipelineError::parse(format!(
                "Invalid {} seed phrase: {e}",
                language_name(language)
            ))
        })?;
        Ok(Self { mnemonic })
    }

    pub fn language(&self) -> Language {
        self.mnemonic.language()
    }

    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let joined = Zeroizing::new(
            words
                .iter()
                .map(|w| w.as_ref().trim())
                .collect::<Vec<_>>()
                .join(" "),
        );
        Self::parse(&joined)
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.word_count()
    }

    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mnemonic.words()
    }

    /// Numbered list, one word per line: `1. abandon\n2. ability\n...`
    pub fn numbered(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::new());
        for (idx, word) in self.words().enumerate() {
            out.push_str(&format!("{}. {word}\n", idx + 1));
        }
        out
    }
}

impl std::fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeedPhrase({} words)", self.word_count())
    }
}

/// Build the text that gets encrypted and split
///
/// The note and the numbered seed phrase are joined by a blank line; an
/// empty part is left out.
pub fn compose_secret(info: &str, phrase: Option<&SeedPhrase>) -> Zeroizing<String> {
    let numbered = phrase.map(SeedPhrase::numbered);
    let parts: Vec<&str> = [Some(info), numbered.as_ref().map(|n| n.as_str())]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    Zeroizing::new(parts.join("\n\n"))
}
