//! Application settings loaded from config.toml
//!
//! Settings only shape the bot surface (which currencies a purchase may be recorded
//! in, and the default one). The ledger engine itself has no tunables. A missing
//! file yields the defaults; a malformed one is an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency used when a purchase command omits one
    pub default_currency: String,
    /// Currencies purchases may be recorded in
    pub currencies: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: "BGN".to_string(),
            currencies: ["BGN", "EUR", "USD", "GBP"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Settings {
    /// Normalizes a user-supplied currency code and checks it against the configured list.
    ///
    /// # Errors
    /// Returns a validation error if the currency is not configured.
    pub fn resolve_currency(&self, requested: Option<&str>) -> Result<String> {
        let code = requested.map_or_else(
            || self.default_currency.clone(),
            |c| c.trim().to_ascii_uppercase(),
        );
        if self.currencies.iter().any(|c| c == &code) {
            Ok(code)
        } else {
            Err(Error::validation(format!(
                "Currency {code} is not supported (expected one of {})",
                self.currencies.join(", ")
            )))
        }
    }

    fn check(self) -> Result<Self> {
        if !self.currencies.contains(&self.default_currency) {
            return Err(Error::Config {
                message: format!(
                    "default_currency {} is not listed in currencies",
                    self.default_currency
                ),
            });
        }
        Ok(self)
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - `default_currency` is not one of `currencies`
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Loading settings from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid or inconsistent.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.check()
}

/// Loads settings from ./config.toml, or the defaults if the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_settings(path)
    } else {
        info!("No config.toml found, using default settings");
        Ok(Settings::default())
    }
}
