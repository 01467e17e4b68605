//! The persisted settings document.
//!
//! Settings are stored as JSON with camelCase keys. Only the fields the
//! engine consumes are modelled; every other key in the document is kept
//! as-is so a load/save cycle never drops data owned by other components.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RuleChain;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error reading or writing settings: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub move_on_open: bool,
    /// Chains in priority order: first listed, first tried.
    pub rule_chains: Vec<RuleChain>,
    pub automatic_moving: bool,
    /// Interval between automatic runs, in milliseconds.
    pub timer: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_on_open: true,
            rule_chains: Vec::new(),
            automatic_moving: false,
            timer: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Settings {
    /// Parse a settings document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] if the document is not valid JSON or a
    /// known key has the wrong shape.
    pub fn from_json(input: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] on I/O or parse failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    /// Serialize and write a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] on serialization or I/O failure.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Chains that take part in selection, in priority order.
    pub fn active_chains(&self) -> impl Iterator<Item = &RuleChain> {
        self.rule_chains.iter().filter(|c| c.active)
    }

    /// The automatic-run interval, if automatic moving is configured with a
    /// positive timer.
    #[must_use]
    pub fn timer_interval(&self) -> Option<Duration> {
        if !self.automatic_moving {
            return None;
        }
        let ms = u64::try_from(self.timer?).ok().filter(|ms| *ms > 0)?;
        Some(Duration::from_millis(ms))
    }
}
