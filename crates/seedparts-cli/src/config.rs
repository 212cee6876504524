//! CLI configuration, parsed from a TOML file plus environment overrides.
//!
//! Priority: command-line flags > environment variables > config file > defaults.

use crate::export::ExportFormat;
use anyhow::{Context, Result};
use seedparts_core::{language_from_name, EncryptionType, Language};
use seedparts_shamir::ThresholdParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for `seedparts split`
    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsSection {
    #[serde(default = "default_shares")]
    pub shares: u8,

    #[serde(default = "default_threshold")]
    pub threshold: u8,

    #[serde(default = "default_encryption")]
    pub encryption: EncryptionType,

    #[serde(default)]
    pub format: ExportFormat,

    #[serde(default = "default_true")]
    pub include_instructions: bool,

    #[serde(default = "default_true")]
    pub include_share_info: bool,

    /// BIP-39 word list for seed phrases; detected from the words when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            shares: default_shares(),
            threshold: default_threshold(),
            encryption: default_encryption(),
            format: ExportFormat::default(),
            include_instructions: true,
            include_share_info: true,
            language: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    /// Filter for env_logger (error, warn, info, debug, trace or module=level)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_shares() -> u8 {
    5
}

fn default_threshold() -> u8 {
    3
}

fn default_encryption() -> EncryptionType {
    EncryptionType::Password
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise start from defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SEEDPARTS_SHARES`
    /// - `SEEDPARTS_THRESHOLD`
    /// - `SEEDPARTS_ENCRYPTION`
    /// - `SEEDPARTS_FORMAT`
    /// - `SEEDPARTS_LANGUAGE`
    /// - `SEEDPARTS_LOG_LEVEL`
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEEDPARTS_SHARES") {
            if let Ok(n) = v.parse::<u8>() {
                self.defaults.shares = n;
            }
        }
        if let Ok(v) = std::env::var("SEEDPARTS_THRESHOLD") {
            if let Ok(t) = v.parse::<u8>() {
                self.defaults.threshold = t;
            }
        }
        if let Ok(v) = std::env::var("SEEDPARTS_ENCRYPTION") {
            if let Ok(encryption) = v.parse::<EncryptionType>() {
                self.defaults.encryption = encryption;
            }
        }
        if let Ok(v) = std::env::var("SEEDPARTS_FORMAT") {
            if let Ok(format) = v.parse::<ExportFormat>() {
                self.defaults.format = format;
            }
        }
        if let Ok(v) = std::env::var("SEEDPARTS_LANGUAGE") {
            if language_from_name(&v).is_some() {
                self.defaults.language = Some(v);
            }
        }
        if let Ok(v) = std::env::var("SEEDPARTS_LOG_LEVEL") {
            self.log.level = v;
        }
    }

    pub fn threshold_params(&self) -> Result<ThresholdParams> {
        ThresholdParams::new(self.defaults.shares, self.defaults.threshold)
            .context("defaults.shares / defaults.threshold are not a valid split")
    }

    /// Configured seed phrase word list, if any
    pub fn language(&self) -> Option<Language> {
        self.defaults.language.as_deref().and_then(language_from_name)
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        self.threshold_params()?;

        if let Some(name) = &self.defaults.language {
            anyhow::ensure!(
                language_from_name(name).is_some(),
                "defaults.language '{name}' is not a BIP-39 word list"
            );
        }

        anyhow::ensure!(!self.log.level.trim().is_empty(), "log.level must not be empty");

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
