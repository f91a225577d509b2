//! Persistence layer.
//!
//! Saves and loads the operator's bankroll settings to/from a JSON file.
//! The engine itself never touches storage; the binary loads settings at
//! startup and saves them whenever they change.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::engine::settings::Settings;

/// Default settings file path.
pub const DEFAULT_SETTINGS_FILE: &str = "sabot_settings.json";

/// Settings as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(flatten)]
    pub settings: Settings,
    pub saved_at: DateTime<Utc>,
}

/// Save settings to a JSON file.
pub fn save_settings(settings: &Settings, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SETTINGS_FILE);
    let stored = StoredSettings {
        settings: settings.clone(),
        saved_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&stored)
        .context("Failed to serialise settings")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write settings to {path}"))?;

    debug!(path, capital = %settings.capital, "Settings saved");
    Ok(())
}

/// Load settings from a JSON file.
/// Returns None if the file doesn't exist (first run).
///
/// Values that fail validation are replaced by the defaults, field by field.
pub fn load_settings(path: Option<&str>) -> Result<Option<Settings>> {
    let path = path.unwrap_or(DEFAULT_SETTINGS_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved settings found, using defaults");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read settings from {path}"))?;

    let stored: StoredSettings = serde_json::from_str(&json)
        .context(format!("Failed to parse settings from {path}"))?;

    let mut settings = Settings::default();
    let _ = settings.set_capital(stored.settings.capital);
    let _ = settings.set_commission(stored.settings.commission_percent);

    info!(
        path,
        capital = %settings.capital,
        commission = settings.commission_percent,
        saved_at = %stored.saved_at,
        "Settings loaded from disk"
    );

    Ok(Some(settings))
}

/// Delete the settings file (for testing or reset).
pub fn delete_settings(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SETTINGS_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete settings file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
