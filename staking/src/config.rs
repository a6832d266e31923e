//! Engine configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! launch_timestamp = 1700000000
//! initial_share_price = 10000
//! late_deadline_days = 365
//!
//! [schedule]
//! base_divisor = 10000
//! window_start_day = 366
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use lockstake_core::constants::{
    INITIAL_SHARE_PRICE, LATE_DEADLINE_DAYS, MAX_LOCK_DAYS, MIN_LOCK_DAYS, SECONDS_PER_DAY,
};
use lockstake_economics::RateSchedule;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Unix timestamp of the first second of day 1
    pub launch_timestamp: i64,
    pub day_seconds: u64,
    pub initial_share_price: u64,
    pub min_duration_days: u64,
    pub max_duration_days: u64,
    /// Grace window after maturity before interest is forfeited
    pub late_deadline_days: u64,
    /// Upper bound on days written by one accrual catch-up
    pub max_days_per_call: u64,
    /// Ledger account holding locked principal
    pub custody_address: String,
    pub schedule: RateSchedule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            launch_timestamp: 0,
            day_seconds: SECONDS_PER_DAY,
            initial_share_price: INITIAL_SHARE_PRICE,
            min_duration_days: MIN_LOCK_DAYS,
            max_duration_days: MAX_LOCK_DAYS,
            late_deadline_days: LATE_DEADLINE_DAYS,
            max_days_per_call: 1_000,
            custody_address: "custody".to_string(),
            schedule: RateSchedule::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_seconds == 0 {
            return Err(ConfigError::Invalid("day_seconds must be greater than zero".into()));
        }
        if self.initial_share_price == 0 {
            return Err(ConfigError::Invalid(
                "initial_share_price must be greater than zero".into(),
            ));
        }
        if self.min_duration_days == 0 || self.min_duration_days > self.max_duration_days {
            return Err(ConfigError::Invalid(format!(
                "duration bounds {}..={} are empty or start at zero",
                self.min_duration_days, self.max_duration_days
            )));
        }
        if self.max_days_per_call == 0 {
            return Err(ConfigError::Invalid(
                "max_days_per_call must be greater than zero".into(),
            ));
        }
        if self.custody_address.is_empty() {
            return Err(ConfigError::Invalid("custody_address is empty".into()));
        }
        self.schedule.validate().map_err(ConfigError::Invalid)
    }
}
