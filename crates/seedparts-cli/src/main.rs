//! seedparts: split a secret into Shamir shares and put it back together.
//!
//! ```text
//! seedparts split -n 5 -t 3 -e password --password-file pw.txt < secret.txt > shares.txt
//! seedparts combine --share-file shares.txt --password-file pw.txt
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod export;

#[derive(Parser)]
#[command(name = "seedparts")]
#[command(about = "Split secrets into threshold shares, optionally encrypted")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, env = "SEEDPARTS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a secret and split it into shares
    Split(commands::split::SplitArgs),
    /// Combine shares and decrypt the secret
    Combine(commands::combine::CombineArgs),
    /// Combine shares and report how the secret is protected
    Inspect(commands::combine::SharesArgs),
    /// Generate a key pair for key encryption
    Keygen(commands::keys::KeygenArgs),
    /// Validate a public or private key file
    CheckKey(commands::keys::CheckKeyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    config.apply_env_overrides();
    config.validate()?;

    env_logger::Builder::new()
        .parse_filters(&config.log.level)
        .init();
    if let Some(path) = &cli.config {
        log::debug!("loaded config from {}", path.display());
    }

    let ctx = commands::Context { config };

    match cli.command {
        Commands::Split(args) => commands::split::run(args, &ctx).await,
        Commands::Combine(args) => commands::combine::run(args, &ctx).await,
        Commands::Inspect(args) => commands::combine::inspect(args, &ctx).await,
        Commands::Keygen(args) => commands::keys::keygen(args, &ctx).await,
        Commands::CheckKey(args) => commands::keys::check_key(args, &ctx).await,
    }
}
