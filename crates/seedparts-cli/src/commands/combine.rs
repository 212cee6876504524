use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use std::path::PathBuf;

use seedparts_core::pipeline;
use seedparts_core::{
    Classification, CredentialKind, DecryptionCredential, PipelineError, PrivateKeyCredential,
};

use super::{
    collect_shares, lookup_secret, read_text_file, write_output, Context, PASSPHRASE_ENV,
    PASSWORD_ENV,
};

#[derive(Args)]
pub struct SharesArgs {
    /// Shares as printed by `seedparts split`
    pub shares: Vec<String>,
    /// File with shares, one per line (repeatable; exported documents work)
    #[arg(long = "share-file")]
    pub share_files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CombineArgs {
    #[command(flatten)]
    pub input: SharesArgs,
    /// File whose first line is the password (else SEEDPARTS_PASSWORD)
    #[arg(long)]
    pub password_file: Option<PathBuf>,
    /// Private key file for key-encrypted secrets
    #[arg(long)]
    pub private_key: Option<PathBuf>,
    /// File whose first line is the key passphrase (else SEEDPARTS_PASSPHRASE)
    #[arg(long)]
    pub passphrase_file: Option<PathBuf>,
    /// Write the secret here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// What to tell the user when a credential is missing
pub fn credential_hint(kind: CredentialKind) -> &'static str {
    match kind {
        CredentialKind::Password => {
            "The secret is password-protected. Provide the password with --password-file or SEEDPARTS_PASSWORD."
        }
        CredentialKind::PrivateKey => {
            "The secret is encrypted to a public key. Provide the private key with --private-key FILE."
        }
        CredentialKind::Passphrase => {
            "The private key is locked. Provide its passphrase with --passphrase-file or SEEDPARTS_PASSPHRASE."
        }
        CredentialKind::PublicKey => "A public key is required.",
    }
}

pub fn describe(classification: Classification) -> &'static str {
    match classification {
        Classification::Plaintext => "plaintext (no credential needed)",
        Classification::PasswordEncrypted => "password-encrypted (password needed)",
        Classification::KeyEncrypted => "key-encrypted (private key needed)",
    }
}

async fn recover(input: &SharesArgs) -> Result<Vec<u8>> {
    let shares = collect_shares(&input.shares, &input.share_files)?;
    anyhow::ensure!(!shares.is_empty(), "No shares given");
    log::debug!("combining {} share(s)", shares.len());
    pipeline::recover_payload(shares)
        .await
        .context("Could not combine the shares")
}

impl CombineArgs {
    /// Collect only the credential the payload asks for
    fn credential(&self, needed: Option<CredentialKind>) -> Result<Option<DecryptionCredential>> {
        match needed {
            None => Ok(None),
            Some(CredentialKind::PrivateKey) => {
                let Some(path) = self.private_key.as_deref() else {
                    return Ok(None);
                };
                let armored = read_text_file(path)?;
                let mut key = PrivateKeyCredential::import(armored.as_str())
                    .with_context(|| format!("{} is not a usable private key", path.display()))?;
                if let Some(passphrase) =
                    lookup_secret(self.passphrase_file.as_deref(), PASSPHRASE_ENV)?
                {
                    key = key.with_passphrase(passphrase.as_str());
                }
                Ok(Some(DecryptionCredential::PrivateKey(key)))
            }
            Some(_) => Ok(lookup_secret(self.password_file.as_deref(), PASSWORD_ENV)?
                .map(DecryptionCredential::Password)),
        }
    }
}

pub async fn run(args: CombineArgs, _ctx: &Context) -> Result<()> {
    let payload = recover(&args.input).await?;

    let classification = pipeline::classify_payload(payload.clone())
        .await
        .context("Combined shares are not a readable secret")?;
    let credential = args.credential(classification.required_credential())?;

    match pipeline::unlock_payload(payload, credential).await {
        Ok(recovered) => {
            log::info!("secret recovered ({:?})", recovered.classification);
            write_output(args.output.as_deref(), &recovered.secret)
        }
        Err(PipelineError::MissingCredential(kind)) => anyhow::bail!(credential_hint(kind)),
        Err(PipelineError::DecryptionFailed) => anyhow::bail!(
            "Decryption failed: wrong password, wrong key or wrong passphrase"
        ),
        Err(e) => Err(e).context("Could not recover the secret"),
    }
}

pub async fn inspect(args: SharesArgs, _ctx: &Context) -> Result<()> {
    let payload = recover(&args).await?;
    let classification = pipeline::classify_payload(payload)
        .await
        .context("Combined shares are not a readable secret")?;
    println!("{}", describe(classification));
    Ok(())
}
