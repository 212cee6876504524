use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use std::path::PathBuf;
use zeroize::Zeroizing;

use seedparts_core::pipeline;
use seedparts_core::{
    compose_secret, language_from_name, language_name, Credential, EncryptionStrategy,
    EncryptionType, Language, SeedPhrase, LANGUAGES,
};
use seedparts_shamir::ThresholdParams;

use super::{lookup_secret, read_input, read_text_file, write_output, Context, PASSWORD_ENV};
use crate::export::{self, ExportFormat, ExportOptions, ShareInfo};

#[derive(Args)]
pub struct SplitArgs {
    /// File holding the secret (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Treat the input as BIP-39 seed phrase words
    #[arg(long)]
    pub seed_phrase: bool,
    /// Word list of the seed phrase, e.g. spanish (detected when omitted)
    #[arg(long, requires = "seed_phrase", value_parser = parse_language)]
    pub language: Option<Language>,
    /// Note stored above the seed phrase
    #[arg(long, requires = "seed_phrase")]
    pub info: Option<String>,
    /// Total number of shares
    #[arg(short = 'n', long)]
    pub shares: Option<u8>,
    /// Shares needed to decode
    #[arg(short, long)]
    pub threshold: Option<u8>,
    /// none, password or key
    #[arg(short, long)]
    pub encryption: Option<EncryptionType>,
    /// Recipient public key file (key encryption)
    #[arg(long)]
    pub public_key: Option<PathBuf>,
    /// File whose first line is the password (else SEEDPARTS_PASSWORD)
    #[arg(long)]
    pub password_file: Option<PathBuf>,
    /// plaintext or markdown
    #[arg(short, long)]
    pub format: Option<ExportFormat>,
    /// Leave out the decode instructions
    #[arg(long)]
    pub no_instructions: bool,
    /// Leave out the threshold and encryption summary
    #[arg(long)]
    pub no_share_info: bool,
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SplitArgs {
    fn threshold_params(&self, ctx: &Context) -> Result<ThresholdParams> {
        let defaults = &ctx.config.defaults;
        let shares = self.shares.unwrap_or(defaults.shares);
        let threshold = self.threshold.unwrap_or(defaults.threshold);
        ThresholdParams::new(shares, threshold)
            .with_context(|| format!("Cannot split into {threshold}-of-{shares}"))
    }

    fn export_options(&self, ctx: &Context) -> ExportOptions {
        let defaults = &ctx.config.defaults;
        ExportOptions {
            format: self.format.unwrap_or(defaults.format),
            include_instructions: defaults.include_instructions && !self.no_instructions,
            include_share_info: defaults.include_share_info && !self.no_share_info,
        }
    }

    fn credential(&self, encryption: EncryptionType) -> Result<Option<Credential>> {
        match encryption {
            EncryptionType::None => Ok(None),
            EncryptionType::Password => {
                let password = lookup_secret(self.password_file.as_deref(), PASSWORD_ENV)?
                    .context("Password encryption needs --password-file or SEEDPARTS_PASSWORD")?;
                Ok(Some(Credential::Password(password)))
            }
            EncryptionType::Key => {
                let path = self
                    .public_key
                    .as_deref()
                    .context("Key encryption needs --public-key FILE")?;
                let armored = read_text_file(path)?;
                Ok(Some(Credential::public_key(armored.as_str())))
            }
        }
    }
}

fn parse_language(name: &str) -> std::result::Result<Language, String> {
    language_from_name(name).ok_or_else(|| {
        let known: Vec<&str> = LANGUAGES.iter().map(|&(name, _)| name).collect();
        format!("unknown word list '{name}' (expected one of: {})", known.join(", "))
    })
}

/// Build the text that gets split from raw input
pub fn prepare_secret(
    input: Zeroizing<String>,
    seed_phrase: bool,
    language: Option<Language>,
    info: Option<&str>,
) -> Result<Zeroizing<String>> {
    if !seed_phrase {
        return Ok(input);
    }
    let phrase = match language {
        Some(language) => SeedPhrase::parse_in(language, &input),
        None => SeedPhrase::parse(&input),
    }
    .context("Input is not a valid seed phrase")?;
    log::debug!("parsed {phrase:?} ({})", language_name(phrase.language()));
    Ok(compose_secret(info.unwrap_or_default().trim(), Some(&phrase)))
}

pub async fn run(args: SplitArgs, ctx: &Context) -> Result<()> {
    let params = args.threshold_params(ctx)?;
    let encryption = args.encryption.unwrap_or(ctx.config.defaults.encryption);
    let credential = args.credential(encryption)?;

    let secret = prepare_secret(
        read_input(args.input.as_deref())?,
        args.seed_phrase,
        args.language.or_else(|| ctx.config.language()),
        args.info.as_deref(),
    )?;
    anyhow::ensure!(!secret.trim().is_empty(), "Nothing to split: the secret is empty");

    let strategy = EncryptionStrategy::for_type(encryption);
    let shares = pipeline::create_shares(secret, strategy, credential, params)
        .await
        .context("Failed to create shares")?;

    let info = ShareInfo {
        threshold: params.threshold,
        total_shares: params.total_shares,
        encryption,
    };
    let document = export::render(&shares, &info, &args.export_options(ctx));
    write_output(args.output.as_deref(), &document)?;

    if let Some(path) = &args.output {
        eprintln!(
            "Wrote {} shares ({}-of-{}, {}) to {}",
            shares.len(),
            params.threshold,
            params.total_shares,
            encryption.label(),
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_prepare_plain_input_untouched() {
        let secret = prepare_secret(Zeroizing::new("  keep me  ".into()), false, None, None).unwrap();
        assert_eq!(secret.as_str(), "  keep me  ");
    }

    #[test]
    fn test_prepare_seed_phrase_with_info() {
        let secret = prepare_secret(
            Zeroizing::new(ABANDON.into()),
            true,
            None,
            Some("Savings wallet"),
        )
        .unwrap();
        assert!(secret.starts_with("Savings wallet\n\n1. abandon\n"));
        assert!(secret.ends_with("12. about\n"));
    }

    #[test]
    fn test_prepare_rejects_bad_phrase() {
        assert!(prepare_secret(Zeroizing::new("not a phrase".into()), true, None, None).is_err());
    }

    #[test]
    fn test_prepare_spanish_phrase() {
        // The all-zero 128-bit entropy phrase in the Spanish list
        let spanish = format!("{}abierto", "ábaco ".repeat(11));
        let detected = prepare_secret(Zeroizing::new(spanish.clone()), true, None, None).unwrap();
        assert!(detected.starts_with("1. "));
        assert!(detected.ends_with("12. abierto\n"));

        let explicit = prepare_secret(
            Zeroizing::new(spanish.clone()),
            true,
            Some(Language::Spanish),
            None,
        )
        .unwrap();
        assert_eq!(explicit.as_str(), detected.as_str());

        let wrong = prepare_secret(Zeroizing::new(spanish), true, Some(Language::English), None);
        assert!(wrong.is_err());
    }

    #[test]
    fn test_language_flag_values() {
        assert_eq!(parse_language("spanish"), Ok(Language::Spanish));
        assert_eq!(parse_language("Japanese"), Ok(Language::Japanese));
        let err = parse_language("elvish").unwrap_err();
        assert!(err.contains("simplified-chinese"));
    }
}
