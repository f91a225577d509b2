//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section is optional and falls back to the table defaults.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use tracing::warn;

use crate::engine::settings::Settings;
use crate::engine::SessionConfig;
use crate::shoe::DEFAULT_DECKS;
use crate::strategy::ev::PayoutTable;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionSection,
    pub bankroll: BankrollConfig,
    pub payouts: PayoutTable,
    pub feed: FeedConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionSection {
    pub decks: u8,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            decks: DEFAULT_DECKS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BankrollConfig {
    pub capital: Decimal,
    pub commission_percent: f64,
}

impl Default for BankrollConfig {
    fn default() -> Self {
        Self {
            capital: dec!(10000000),
            commission_percent: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    /// File the card scanner appends detected labels to.
    pub path: String,
    pub poll_interval_ms: u64,
    /// Ignore what is already in the file at startup.
    pub skip_existing: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "detected_cards.txt".to_string(),
            poll_interval_ms: 500,
            skip_existing: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: crate::storage::DEFAULT_SETTINGS_FILE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Bankroll settings, falling back to defaults for invalid values.
    pub fn settings(&self) -> Settings {
        Settings::new(self.bankroll.capital, self.bankroll.commission_percent).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid bankroll config, using defaults");
            Settings::default()
        })
    }

    /// Session parameters; a zero deck count falls back to the default.
    pub fn session_config(&self) -> SessionConfig {
        let decks = if self.session.decks == 0 {
            warn!("Deck count of 0 in config, using {DEFAULT_DECKS}");
            DEFAULT_DECKS
        } else {
            self.session.decks
        };
        SessionConfig {
            decks,
            settings: self.settings(),
            payouts: self.payouts.clone(),
        }
    }
}
