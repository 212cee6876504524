//! Share export documents (plain text and Markdown)

use seedparts_core::EncryptionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Plaintext,
    Markdown,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plaintext => "plaintext",
            Self::Markdown => "markdown",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "text" | "txt" => Ok(Self::Plaintext),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "unknown export format '{other}' (expected plaintext or markdown)"
            )),
        }
    }
}

/// What the reader of an export needs to know about the split
#[derive(Debug, Clone, Copy)]
pub struct ShareInfo {
    pub threshold: u8,
    pub total_shares: u8,
    pub encryption: EncryptionType,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_instructions: bool,
    pub include_share_info: bool,
}

const INSTRUCTION_STEPS: [&str; 4] = [
    "Collect the required number of shares.",
    "Save each share on its own line in a text file, or keep them at hand.",
    "Run `seedparts combine` with the shares (or `--share-file`).",
    "Supply the password or private key if the secret is encrypted.",
];

fn encryption_sentence(encryption: EncryptionType, markdown: bool) -> String {
    let (emphasis, rest) = match encryption {
        EncryptionType::None => ("not encrypted", ""),
        EncryptionType::Password => (
            "encrypted with a password",
            " You will need this password to decode the secret.",
        ),
        EncryptionType::Key => (
            "encrypted with a public key",
            " You will need the corresponding private key (and key passphrase, if applicable) to decode the secret.",
        ),
    };
    if markdown {
        format!("This secret is **{emphasis}**.{rest}")
    } else {
        format!("This secret is {emphasis}.{rest}")
    }
}

fn instructions() -> String {
    INSTRUCTION_STEPS
        .iter()
        .enumerate()
        .map(|(idx, step)| format!("{}. {step}\n", idx + 1))
        .collect()
}

/// Render shares as a single document
pub fn render(shares: &[String], info: &ShareInfo, options: &ExportOptions) -> String {
    match options.format {
        ExportFormat::Plaintext => render_plaintext(shares, info, options),
        ExportFormat::Markdown => render_markdown(shares, info, options),
    }
}

fn render_plaintext(shares: &[String], info: &ShareInfo, options: &ExportOptions) -> String {
    let mut out = String::new();

    if options.include_instructions {
        out.push_str("Seed Parts Decode Instructions:\n\n");
        out.push_str(&instructions());
        out.push('\n');
    }

    if options.include_share_info {
        out.push_str("Share Information:\n\n");
        out.push_str(&format!(
            "At least {} of {} shares are required to decode the secret.\n\n",
            info.threshold, info.total_shares
        ));
        out.push_str(&encryption_sentence(info.encryption, false));
        out.push_str("\n\n");
    }

    for (idx, share) in shares.iter().enumerate() {
        out.push_str(&format!("Share {}:\n{share}\n\n", idx + 1));
    }
    out
}

fn render_markdown(shares: &[String], info: &ShareInfo, options: &ExportOptions) -> String {
    let mut out = String::new();

    if options.include_instructions {
        out.push_str("# Seed Parts Decode Instructions\n\n");
        out.push_str(&instructions());
        out.push('\n');
    }

    if options.include_share_info {
        out.push_str("## Share Information\n\n");
        out.push_str(&format!(
            "At least **{}** of {} shares are required to decode the secret.\n\n",
            info.threshold, info.total_shares
        ));
        out.push_str(&encryption_sentence(info.encryption, true));
        out.push_str("\n\n");
    }

    out.push_str("# Shares\n\n");
    for (idx, share) in shares.iter().enumerate() {
        out.push_str(&format!("## Share {}\n```\n{share}\n```\n\n", idx + 1));
    }
    out
}
