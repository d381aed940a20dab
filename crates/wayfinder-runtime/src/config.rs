#![forbid(unsafe_code)]

//! Tunable parameters for the navigator and the progress indicator.
//!
//! Every field defaults to the value the engine was designed around, so
//! `WayfinderConfig::default()` is the production configuration. With the
//! `config` feature the whole tree can be loaded from TOML or JSON:
//!
//! ```toml
//! # wayfinder.toml
//! [navigator]
//! scroll_offset = 120.0
//! dev_validation = false
//!
//! [navigator.retry]
//! max_attempts = 30
//! backoff = { kind = "fixed", delay_ms = 100 }
//!
//! [progress]
//! seed = 7
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::retry::RetryPolicy;

/// Navigator parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NavigatorConfig {
    /// Pixels kept clear above a section for the fixed header.
    pub scroll_offset: f64,
    /// Lookup budget for sections that are not mounted yet.
    pub retry: RetryPolicy,
    /// Delay between a smooth scroll and the focus hand-off, in ms.
    pub focus_delay_ms: u64,
    /// Settling delay before the DOM cross-check runs, in ms.
    pub audit_delay_ms: u64,
    /// Run registry validation and the DOM cross-check on mount.
    pub dev_validation: bool,
    /// Rewrite legacy hash formats in place before resolving them.
    pub legacy_migration: bool,
    /// Maximum retained navigation log entries.
    pub log_capacity: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            scroll_offset: 100.0,
            retry: RetryPolicy::default(),
            focus_delay_ms: 400,
            audit_delay_ms: 1_000,
            dev_validation: cfg!(debug_assertions),
            legacy_migration: true,
            log_capacity: 256,
        }
    }
}

impl NavigatorConfig {
    /// Delay before focus after a smooth scroll.
    #[must_use]
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    /// Delay before the DOM cross-check.
    #[must_use]
    pub fn audit_delay(&self) -> Duration {
        Duration::from_millis(self.audit_delay_ms)
    }
}

/// Progress indicator parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ProgressConfig {
    /// Interval between simulated progress increments, in ms.
    pub tick_ms: u64,
    /// Smallest increment per tick, in percent.
    pub min_increment: f64,
    /// Largest increment per tick (exclusive), in percent.
    pub max_increment: f64,
    /// Progress never exceeds this while loading.
    pub ceiling: f64,
    /// Time after the hash change at which the bar jumps to 100%, in ms.
    pub settle_ms: u64,
    /// How long the full bar stays visible before fading, in ms.
    pub complete_hold_ms: u64,
    /// Fade-out duration, in ms.
    pub fade_ms: u64,
    /// Seed for the increment generator. `None` uses the host-supplied seed.
    pub seed: Option<u64>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            min_increment: 0.0,
            max_increment: 10.0,
            ceiling: 90.0,
            settle_ms: 500,
            complete_hold_ms: 200,
            fade_ms: 300,
            seed: None,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct WayfinderConfig {
    pub navigator: NavigatorConfig,
    pub progress: ProgressConfig,
}

impl WayfinderConfig {
    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk and validate.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Check every parameter is within range.
    ///
    /// Returns one message per problem; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let nav = &self.navigator;

        if !nav.scroll_offset.is_finite() || nav.scroll_offset < 0.0 {
            errors.push(format!(
                "navigator.scroll_offset must be finite and >= 0, got {}",
                nav.scroll_offset
            ));
        }
        if nav.retry.max_attempts == 0 {
            errors.push("navigator.retry.max_attempts must be > 0".into());
        }
        if nav.log_capacity == 0 {
            errors.push("navigator.log_capacity must be > 0".into());
        }

        let progress = &self.progress;
        if progress.tick_ms == 0 {
            errors.push("progress.tick_ms must be > 0".into());
        }
        if !(progress.min_increment.is_finite() && progress.max_increment.is_finite())
            || !(progress.min_increment >= 0.0 && progress.min_increment < progress.max_increment)
        {
            errors.push(format!(
                "progress increments must be finite and satisfy 0 <= min < max, got {}..{}",
                progress.min_increment, progress.max_increment
            ));
        }
        if !(progress.ceiling.is_finite() && progress.ceiling > 0.0 && progress.ceiling < 100.0) {
            errors.push(format!(
                "progress.ceiling must be finite and in (0, 100), got {}",
                progress.ceiling
            ));
        }

        errors
    }
}

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => write!(f, "TOML serialization error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WayfinderConfig::default().validate().is_empty());
    }

    #[test]
    fn defaults_match_documented_values() {
        let nav = NavigatorConfig::default();
        assert_eq!(nav.scroll_offset, 100.0);
        assert_eq!(nav.retry.max_attempts, 20);
        assert_eq!(nav.retry.delay(1), Duration::from_millis(150));
        assert_eq!(nav.focus_delay(), Duration::from_millis(400));
        assert_eq!(nav.audit_delay(), Duration::from_millis(1_000));
        assert_eq!(nav.dev_validation, cfg!(debug_assertions));
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let mut config = WayfinderConfig::default();
        config.navigator.scroll_offset = f64::NAN;
        config.navigator.retry.max_attempts = 0;
        config.progress.ceiling = 100.0;
        config.progress.min_increment = 5.0;
        config.progress.max_increment = 5.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn infinite_progress_values_are_rejected() {
        let mut config = WayfinderConfig::default();
        config.progress.max_increment = f64::INFINITY;
        config.progress.ceiling = f64::NAN;
        let errors = config.validate();
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].contains("finite"));

        let mut config = WayfinderConfig::default();
        config.progress.min_increment = f64::NEG_INFINITY;
        assert_eq!(config.validate().len(), 1);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_infinity_fails_validation() {
        let err = WayfinderConfig::from_toml_str("[progress]\nmax_increment = inf\nseed = 1")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err}");
    }

    #[test]
    fn validated_wraps_errors() {
        let mut config = WayfinderConfig::default();
        config.progress.tick_ms = 0;
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("progress.tick_ms"));
    }
}
