//! Application configuration.
//!
//! Constants that used to be hard-coded in the views (the denomination list,
//! weekday labels, keypad limits) live here and are injected into the
//! services at construction. Every field has a default, so a YAML file only
//! needs to name what it overrides.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const DEFAULT_DENOMINATIONS: [u32; 9] = [10000, 5000, 1000, 500, 100, 50, 10, 5, 1];
pub const DEFAULT_WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub wallet: WalletConfig,
    pub calendar: CalendarConfig,
    pub input: InputConfig,
    /// Prefix used when formatting amounts
    pub currency_symbol: String,
    /// chrono format for the date stored with each history entry
    pub history_date_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Unit values, strictly descending and ending in 1
    pub denominations: Vec<u32>,
    /// Counts above this collapse into one icon with a multiplier label
    pub collapse_threshold: u64,
    /// Unit values at or above this are bills, below are coins
    pub bill_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Column headers, Sunday first
    pub weekday_labels: Vec<String>,
    /// chrono format for the month header
    pub title_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum characters on the amount keypad, sign included
    pub max_digits: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wallet: WalletConfig::default(),
            calendar: CalendarConfig::default(),
            input: InputConfig::default(),
            currency_symbol: "¥".to_string(),
            history_date_format: "%Y/%m/%d".to_string(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            denominations: DEFAULT_DENOMINATIONS.to_vec(),
            collapse_threshold: 4,
            bill_threshold: 1000,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            weekday_labels: DEFAULT_WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
            title_format: "%B %Y".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_digits: 12 }
    }
}

impl AppConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file, or return the defaults when the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let denominations = &self.wallet.denominations;
        if denominations.is_empty() {
            return Err(ConfigError::Invalid("denominations must not be empty".to_string()));
        }
        if denominations.contains(&0) {
            return Err(ConfigError::Invalid("denominations must be positive".to_string()));
        }
        if denominations.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ConfigError::Invalid(
                "denominations must be strictly descending".to_string(),
            ));
        }
        if denominations.last() != Some(&1) {
            return Err(ConfigError::Invalid(
                "denominations must end with 1 so every amount breaks down exactly".to_string(),
            ));
        }
        if self.calendar.weekday_labels.len() != 7 {
            return Err(ConfigError::Invalid(format!(
                "expected 7 weekday labels, got {}",
                self.calendar.weekday_labels.len()
            )));
        }
        if self.input.max_digits == 0 {
            return Err(ConfigError::Invalid("max_digits must be at least 1".to_string()));
        }
        Ok(())
    }
}
