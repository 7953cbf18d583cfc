#![forbid(unsafe_code)]

//! Run configuration as data.
//!
//! Everything a host would otherwise wire from widgets (algorithm, delay,
//! array size, redraw cadence) lives in one [`VizConfig`] that can be loaded
//! from TOML or JSON. Every field is defaulted, so a partial file only
//! overrides what it names.
//!
//! ```toml
//! # sortviz.toml
//! [run]
//! algorithm = "Quick Sort"
//! delay_ms = 10
//!
//! [sequence]
//! len = 40
//! seed = 7
//!
//! [render]
//! frame_interval_ms = 16
//! clear_screen = true
//! ```
//!
//! ```rust,ignore
//! let config = VizConfig::from_toml_file("sortviz.toml")?.validated()?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sortviz_core::Algorithm;
use web_time::Duration;

use crate::error::{Result, SortvizError};

/// Longest sequence a run accepts.
pub const MAX_LEN: usize = 512;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub run: RunSection,
    pub sequence: SequenceSection,
    pub render: RenderSection,
}

/// Algorithm selection and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Display name, e.g. `"Merge Sort"`.
    pub algorithm: String,
    /// Sleep between visual steps.
    pub delay_ms: u64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Bubble.name().to_string(),
            delay_ms: 10,
        }
    }
}

/// The bars to sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceSection {
    /// Number of bars; heights are `1..=len`.
    pub len: usize,
    /// Shuffle seed. Random when absent.
    pub seed: Option<u64>,
}

impl Default for SequenceSection {
    fn default() -> Self {
        Self { len: 40, seed: None }
    }
}

/// Host redraw cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub frame_interval_ms: u64,
    pub clear_screen: bool,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            clear_screen: true,
        }
    }
}

impl VizConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load by extension: `.json` as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SortvizError::invalid_config(vec![e.to_string()]))
    }

    /// Check every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if Algorithm::from_name(&self.run.algorithm).is_none() {
            errors.push(format!(
                "run.algorithm must be one of {}, got {:?}",
                Algorithm::ALL.map(Algorithm::name).join(", "),
                self.run.algorithm
            ));
        }

        if self.sequence.len == 0 {
            errors.push("sequence.len must be > 0".into());
        }
        if self.sequence.len > MAX_LEN {
            errors.push(format!(
                "sequence.len must be <= {MAX_LEN}, got {}",
                self.sequence.len
            ));
        }

        if self.render.frame_interval_ms == 0 {
            errors.push("render.frame_interval_ms must be > 0".into());
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(SortvizError::invalid_config(problems))
        }
    }

    /// The configured algorithm, if its name is recognized.
    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        Algorithm::from_name(&self.run.algorithm)
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.run.delay_ms)
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.render.frame_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = VizConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.algorithm(), Some(Algorithm::Bubble));
        assert_eq!(config.delay(), Duration::from_millis(10));
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn partial_toml_overrides_named_fields() {
        let config = VizConfig::from_toml_str(
            r#"
            [run]
            algorithm = "Merge Sort"

            [sequence]
            seed = 99
            "#,
        )
        .unwrap();
        assert_eq!(config.algorithm(), Some(Algorithm::Merge));
        assert_eq!(config.run.delay_ms, 10);
        assert_eq!(config.sequence.len, 40);
        assert_eq!(config.sequence.seed, Some(99));
    }

    #[test]
    fn json_loads_too() {
        let config =
            VizConfig::from_json_str(r#"{"run": {"algorithm": "Quick Sort", "delay_ms": 0}}"#)
                .unwrap();
        assert_eq!(config.algorithm(), Some(Algorithm::Quick));
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = VizConfig::default();
        config.run.algorithm = "Bogo Sort".into();
        config.sequence.len = 0;
        config.render.frame_interval_ms = 0;
        let problems = config.validate();
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(problems[0].contains("Bogo Sort"));
    }

    #[test]
    fn oversized_sequence_is_rejected() {
        let mut config = VizConfig::default();
        config.sequence.len = MAX_LEN + 1;
        let err = config.validated().unwrap_err();
        assert!(matches!(err, SortvizError::InvalidConfig { .. }));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = VizConfig::from_toml_str("[run\nalgorithm = 3").unwrap_err();
        assert!(matches!(err, SortvizError::Toml(_)));
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut config = VizConfig::default();
        config.run.algorithm = "Selection Sort".into();
        config.sequence.seed = Some(3);
        let text = config.to_toml_string().unwrap();
        assert_eq!(VizConfig::from_toml_str(&text).unwrap(), config);
    }
}
