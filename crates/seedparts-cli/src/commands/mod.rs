pub mod combine;
pub mod keys;
pub mod split;

use anyhow::{Context as AnyhowContext, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use crate::config::Config;

pub const PASSWORD_ENV: &str = "SEEDPARTS_PASSWORD";
pub const PASSPHRASE_ENV: &str = "SEEDPARTS_PASSPHRASE";

/// Global context passed to all commands
pub struct Context {
    pub config: Config,
}

/// Read a text file, naming it in the error
pub fn read_text_file(path: &Path) -> Result<Zeroizing<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Zeroizing::new(text))
}

/// Read the secret from `path`, or stdin when no path is given
///
/// Trailing line breaks are dropped; everything else is kept as typed.
pub fn read_input(path: Option<&Path>) -> Result<Zeroizing<String>> {
    let raw = match path {
        Some(path) => read_text_file(path)?,
        None => {
            let mut buf = Zeroizing::new(String::new());
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read secret from stdin")?;
            buf
        }
    };
    Ok(Zeroizing::new(
        raw.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

/// Look up a password-like value: file first, then the environment
///
/// Only the first line of the file counts. Empty values count as absent.
pub fn lookup_secret(file: Option<&Path>, env_var: &str) -> Result<Option<Zeroizing<String>>> {
    let value = match file {
        Some(path) => {
            let text = read_text_file(path)?;
            Zeroizing::new(text.lines().next().unwrap_or_default().to_string())
        }
        None => match std::env::var(env_var) {
            Ok(v) => Zeroizing::new(v),
            Err(_) => return Ok(None),
        },
    };
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn looks_like_share(line: &str) -> bool {
    line.len() >= 8
        && line
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

/// Pull share lines out of a file's text
///
/// Anything that is not a bare base64 line is skipped, so an exported share
/// document can be passed as is.
pub fn extract_shares(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| looks_like_share(line))
        .map(str::to_string)
        .collect()
}

/// Shares from the command line followed by shares from files
pub fn collect_shares(inline: &[String], files: &[PathBuf]) -> Result<Vec<String>> {
    let mut shares: Vec<String> = inline
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    for path in files {
        let text = read_text_file(path)?;
        let found = extract_shares(&text);
        log::debug!("{} share(s) read from {}", found.len(), path.display());
        shares.extend(found);
    }
    Ok(shares)
}

/// Write to `path`, or stdout when no path is given
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(())
        }
    }
}
