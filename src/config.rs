//! Injector configuration.
//!
//! Configuration comes from three places, in increasing priority: the
//! defaults, the process environment (`KATANA_*` variables) and explicit
//! builder calls. With the `config` feature the whole struct can also be
//! loaded from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default maximum resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment variable overriding [`InjectorConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "KATANA_MAX_DEPTH";

/// Environment variable overriding [`InjectorConfig::record_timings`].
pub const ENV_RECORD_TIMINGS: &str = "KATANA_RECORD_TIMINGS";

/// Tunables for an [`Injector`](crate::Injector).
///
/// # Examples
///
/// ```rust
/// use katana_di::{Injector, InjectorConfig};
///
/// let config = InjectorConfig::default()
///     .with_max_depth(64)
///     .with_record_timings(false);
///
/// let injector = Injector::with_config(config);
/// assert_eq!(injector.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectorConfig {
    /// Deepest constructor nesting allowed before resolution fails with
    /// [`DiError::DepthExceeded`](crate::DiError::DepthExceeded).
    pub max_depth: usize,
    /// Whether observers receive measured durations. When disabled they
    /// receive `Duration::ZERO` and no clock is read.
    pub record_timings: bool,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            record_timings: true,
        }
    }
}

impl InjectorConfig {
    /// Defaults overridden by `KATANA_MAX_DEPTH` and `KATANA_RECORD_TIMINGS`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().merge_env(|name| env::var(name).ok())
    }

    fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => self.max_depth = depth,
                _ => tracing::warn!(variable = ENV_MAX_DEPTH, value = %raw, "ignoring invalid max depth"),
            }
        }
        if let Some(raw) = lookup(ENV_RECORD_TIMINGS) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.record_timings = true,
                "0" | "false" | "no" | "off" => self.record_timings = false,
                _ => tracing::warn!(variable = ENV_RECORD_TIMINGS, value = %raw, "ignoring invalid flag"),
            }
        }
        self
    }

    /// Loads a configuration from JSON; missing fields keep their defaults
    /// and a zero `max_depth` is clamped to one.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        let max_depth = config.max_depth;
        Ok(config.with_max_depth(max_depth))
    }

    /// Sets the maximum resolution depth. Zero is clamped to one.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Enables or disables duration measurement for observers.
    pub fn with_record_timings(mut self, record_timings: bool) -> Self {
        self.record_timings = record_timings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = InjectorConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.record_timings);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = InjectorConfig::default()
            .merge_env(lookup(&[(ENV_MAX_DEPTH, "32"), (ENV_RECORD_TIMINGS, "off")]));
        assert_eq!(config.max_depth, 32);
        assert!(!config.record_timings);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let config = InjectorConfig::default()
            .merge_env(lookup(&[(ENV_MAX_DEPTH, "zero"), (ENV_RECORD_TIMINGS, "maybe")]));
        assert_eq!(config, InjectorConfig::default());

        let config = InjectorConfig::default().merge_env(lookup(&[(ENV_MAX_DEPTH, "0")]));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn builder_clamps_depth() {
        assert_eq!(InjectorConfig::default().with_max_depth(0).max_depth, 1);
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_from_json() {
        let config = InjectorConfig::from_json(r#"{ "max_depth": 8 }"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert!(config.record_timings);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_zero_depth_is_clamped() {
        let config = InjectorConfig::from_json(r#"{ "max_depth": 0 }"#).unwrap();
        assert_eq!(config.max_depth, 1);
    }
}
