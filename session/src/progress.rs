//! Meta-progression counters kept across waves and written out between runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Waves finished by clearing every monster.
pub const WAVES_CLEARED: &str = "waves_cleared";
/// Monsters killed.
pub const MONSTERS_SLAIN: &str = "monsters_slain";
/// Highest wave ever started.
pub const HIGHEST_WAVE: &str = "highest_wave";
/// Paid revives bought.
pub const REVIVES_PAID: &str = "revives_paid";
/// Gold collected from loot.
pub const GOLD_EARNED: &str = "gold_earned";

/// Failure to read or write a progress record.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// The text is not a valid record.
    #[error("malformed progress record: {0}")]
    Parse(#[from] toml::de::Error),
    /// The record could not be rendered.
    #[error("failed to serialise progress record: {0}")]
    Serialise(#[from] toml::ser::Error),
}

/// Flat key/value record of counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    counters: BTreeMap<String, i64>,
}

impl ProgressRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key`; missing counters read as zero.
    #[must_use]
    pub fn get(&self, key: &str) -> i64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Adds `amount` to `key`.
    pub fn bump(&mut self, key: &str, amount: i64) {
        let counter = self.counters.entry(key.to_owned()).or_insert(0);
        *counter = counter.saturating_add(amount);
    }

    /// Raises `key` to `value` unless it already holds more.
    pub fn raise_to(&mut self, key: &str, value: i64) {
        let counter = self.counters.entry(key.to_owned()).or_insert(value);
        *counter = (*counter).max(value);
    }

    /// Every counter in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counters.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Renders the record as TOML.
    pub fn to_toml(&self) -> Result<String, ProgressError> {
        Ok(toml::to_string(self)?)
    }

    /// Parses a record previously written with [`ProgressRecord::to_toml`].
    pub fn from_toml(text: &str) -> Result<Self, ProgressError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_counters_read_as_zero() {
        let record = ProgressRecord::new();
        assert_eq!(record.get(WAVES_CLEARED), 0);
    }

    #[test]
    fn highest_wave_only_rises() {
        let mut record = ProgressRecord::new();
        record.raise_to(HIGHEST_WAVE, 4);
        record.raise_to(HIGHEST_WAVE, 2);
        assert_eq!(record.get(HIGHEST_WAVE), 4);
    }

    #[test]
    fn record_is_written_as_flat_toml() {
        let mut record = ProgressRecord::new();
        record.bump(MONSTERS_SLAIN, 7);
        record.bump(GOLD_EARNED, 63);
        let text = record.to_toml().expect("serialise");
        assert_eq!(text, "gold_earned = 63\nmonsters_slain = 7\n");
        assert_eq!(ProgressRecord::from_toml(&text).expect("parse"), record);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(
            ProgressRecord::from_toml("waves_cleared = \"many\""),
            Err(ProgressError::Parse(_))
        ));
    }
}
