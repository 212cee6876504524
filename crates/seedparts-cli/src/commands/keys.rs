use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use seedparts_core::armor::{self, ArmorKind};
use seedparts_core::{pipeline, validate_private_key, validate_public_key};

use super::{lookup_secret, read_text_file, Context, PASSPHRASE_ENV};

pub const PUBLIC_KEY_FILE: &str = "public.asc";
pub const PRIVATE_KEY_FILE: &str = "private.asc";

#[derive(Args)]
pub struct KeygenArgs {
    /// Directory for public.asc and private.asc
    #[arg(long)]
    pub out_dir: PathBuf,
    /// Lock the private key with a passphrase
    #[arg(long)]
    pub protect: bool,
    /// File whose first line is the passphrase (else SEEDPARTS_PASSPHRASE)
    #[arg(long, requires = "protect")]
    pub passphrase_file: Option<PathBuf>,
    /// Replace existing key files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CheckKeyArgs {
    /// Armored public or private key
    pub file: PathBuf,
}

/// Write a private key file readable by the owner only
///
/// The file is created with its final mode, so the key is never on disk with
/// wider permissions. An existing file is truncated and restricted too.
fn write_private(path: &Path, text: &str) -> Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    // mode() only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict {}", path.display()))?;
    }

    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub async fn keygen(args: KeygenArgs, _ctx: &Context) -> Result<()> {
    let passphrase = if args.protect {
        let passphrase = lookup_secret(args.passphrase_file.as_deref(), PASSPHRASE_ENV)?
            .context("--protect needs --passphrase-file or SEEDPARTS_PASSPHRASE")?;
        Some(passphrase)
    } else {
        None
    };

    let public_path = args.out_dir.join(PUBLIC_KEY_FILE);
    let private_path = args.out_dir.join(PRIVATE_KEY_FILE);
    if !args.force {
        for path in [&public_path, &private_path] {
            anyhow::ensure!(
                !path.exists(),
                "{} already exists (use --force to replace it)",
                path.display()
            );
        }
    }

    let pair = pipeline::generate_key_pair(passphrase)
        .await
        .context("Key generation failed")?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    std::fs::write(&public_path, &pair.public_armored)
        .with_context(|| format!("Failed to write {}", public_path.display()))?;
    write_private(&private_path, &pair.private_armored)?;

    log::info!("generated key {}", pair.fingerprint);
    println!("Fingerprint: {}", pair.fingerprint);
    println!("Public key:  {}", public_path.display());
    println!("Private key: {}", private_path.display());
    Ok(())
}

/// Validate a key file and describe it
pub fn check_key_text(text: &str) -> Result<String> {
    let kind = armor::detect(text).context("Not an armored OpenPGP key")?;
    match kind {
        ArmorKind::PublicKey => {
            let info = validate_public_key(text).context("Invalid public key")?;
            Ok(format!("Public key, fingerprint {}", info.fingerprint))
        }
        ArmorKind::PrivateKey => {
            let info = validate_private_key(text).context("Invalid private key")?;
            let lock = if info.passphrase_required {
                "passphrase-protected"
            } else {
                "not protected"
            };
            Ok(format!("Private key ({lock}), fingerprint {}", info.fingerprint))
        }
        ArmorKind::Message => anyhow::bail!("This is an encrypted message, not a key"),
    }
}

pub async fn check_key(args: CheckKeyArgs, _ctx: &Context) -> Result<()> {
    let text = read_text_file(&args.file)?;
    let summary = check_key_text(&text)
        .with_context(|| format!("{} is not a usable key", args.file.display()))?;
    println!("{summary}");
    Ok(())
}
