//! Engine configuration
//!
//! Loaded from the environment (after `dotenv`) or built directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ScoreError;
use crate::models::Mode;
use crate::Result;

/// Default cap on raw rows read per bank account.
pub const DEFAULT_MAX_TRANSACTIONS_PER_ACCOUNT: usize = 90;

const ENV_MODE: &str = "FHS_SCORING_MODE";
const ENV_MAX_TRANSACTIONS: &str = "FHS_MAX_TRANSACTIONS_PER_ACCOUNT";
const ENV_LOOKBACK_DAYS: &str = "FHS_LOOKBACK_DAYS";
const ENV_AS_OF: &str = "FHS_AS_OF_DATE";

/// Bounds how much of each account's transaction history is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWindow {
    /// Keep only the last N raw rows per account. `None` reads everything.
    pub max_per_account: Option<usize>,
    /// Drop rows older than `anchor - lookback_days`.
    pub lookback_days: Option<u32>,
    /// Lookback anchor. Defaults to the latest transaction date seen, so
    /// results never depend on the wall clock.
    pub as_of: Option<NaiveDate>,
}

impl TransactionWindow {
    pub fn unbounded() -> Self {
        Self {
            max_per_account: None,
            lookback_days: None,
            as_of: None,
        }
    }
}

impl Default for TransactionWindow {
    fn default() -> Self {
        Self {
            max_per_account: Some(DEFAULT_MAX_TRANSACTIONS_PER_ACCOUNT),
            lookback_days: None,
            as_of: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mode: Mode,
    pub window: TransactionWindow,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(ENV_MODE) {
            config.mode = mode.parse()?;
        }

        if let Some(raw) = lookup(ENV_MAX_TRANSACTIONS) {
            let max: usize = parse_var(ENV_MAX_TRANSACTIONS, &raw)?;
            config.window.max_per_account = (max > 0).then_some(max);
        }

        if let Some(raw) = lookup(ENV_LOOKBACK_DAYS) {
            config.window.lookback_days = Some(parse_var(ENV_LOOKBACK_DAYS, &raw)?);
        }

        if let Some(raw) = lookup(ENV_AS_OF) {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                ScoreError::Config(format!("{} must be YYYY-MM-DD ({}): {}", ENV_AS_OF, raw, e))
            })?;
            config.window.as_of = Some(date);
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ScoreError::Config(format!("Invalid {} value '{}': {}", key, raw, e)))
}
