//! TOML-based configuration.
//!
//! Stores:
//! - the cycle model (length and count)
//! - the per-tier cap of the proximity ranker
//! - optional wall-clock presets the CLI falls back to when a flag is omitted
//!
//! Configuration is stored at `~/.config/cyclewake/config.toml`.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::parse_wall_clock;
use crate::cycle::{DEFAULT_CYCLE_COUNT, MAX_CYCLE_COUNT, MAX_CYCLE_LENGTH_MINUTES};
use crate::error::{ConfigError, Result, ValidationError};
use crate::intersection::DEFAULT_PER_TIER_CAP;
use crate::planner::DEFAULT_CYCLE_LENGTH_MINUTES;

/// Cycle model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default = "default_length_minutes")]
    pub length_minutes: i64,
    #[serde(default = "default_count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_per_tier_cap")]
    pub per_tier_cap: usize,
}

/// Wall-clock presets in `HH:MM`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub bedtime: Option<String>,
    #[serde(default)]
    pub prayer_time: Option<String>,
    #[serde(default)]
    pub prayer_window_start: Option<String>,
    #[serde(default)]
    pub prayer_window_end: Option<String>,
    #[serde(default)]
    pub work_time: Option<String>,
    #[serde(default)]
    pub must_wake_by: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cyclewake/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_length_minutes() -> i64 {
    DEFAULT_CYCLE_LENGTH_MINUTES
}
fn default_count() -> usize {
    DEFAULT_CYCLE_COUNT
}
fn default_per_tier_cap() -> usize {
    DEFAULT_PER_TIER_CAP
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            length_minutes: default_length_minutes(),
            count: default_count(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            per_tier_cap: default_per_tier_cap(),
        }
    }
}

fn parse_preset(value: Option<&str>) -> Result<Option<NaiveTime>, ValidationError> {
    value.map(parse_wall_clock).transpose()
}

impl DefaultsConfig {
    pub fn bedtime(&self) -> Result<Option<NaiveTime>, ValidationError> {
        parse_preset(self.bedtime.as_deref())
    }

    pub fn prayer_time(&self) -> Result<Option<NaiveTime>, ValidationError> {
        parse_preset(self.prayer_time.as_deref())
    }

    /// Both window ends, or `None` unless both are set.
    pub fn prayer_window(&self) -> Result<Option<(NaiveTime, NaiveTime)>, ValidationError> {
        let start = parse_preset(self.prayer_window_start.as_deref())?;
        let end = parse_preset(self.prayer_window_end.as_deref())?;
        Ok(start.zip(end))
    }

    pub fn work_time(&self) -> Result<Option<NaiveTime>, ValidationError> {
        parse_preset(self.work_time.as_deref())
    }

    pub fn must_wake_by(&self) -> Result<Option<NaiveTime>, ValidationError> {
        parse_preset(self.must_wake_by.as_deref())
    }

    fn presets(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("defaults.bedtime", self.bedtime.as_deref()),
            ("defaults.prayer_time", self.prayer_time.as_deref()),
            ("defaults.prayer_window_start", self.prayer_window_start.as_deref()),
            ("defaults.prayer_window_end", self.prayer_window_end.as_deref()),
            ("defaults.work_time", self.work_time.as_deref()),
            ("defaults.must_wake_by", self.must_wake_by.as_deref()),
        ]
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as an integer")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".to_string()));
                    }
                    // Optional presets: an empty value clears them
                    serde_json::Value::Null | serde_json::Value::String(_) if value.trim().is_empty() => {
                        serde_json::Value::Null
                    }
                    _ => serde_json::Value::String(value.trim().into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Check value ranges and preset formats.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CYCLE_LENGTH_MINUTES).contains(&self.cycle.length_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "cycle.length_minutes".into(),
                message: ValidationError::InvalidCycleLength {
                    minutes: self.cycle.length_minutes,
                }
                .to_string(),
            });
        }
        if !(1..=MAX_CYCLE_COUNT).contains(&self.cycle.count) {
            return Err(ConfigError::InvalidValue {
                key: "cycle.count".into(),
                message: ValidationError::InvalidCycleCount {
                    count: self.cycle.count,
                }
                .to_string(),
            });
        }
        for (key, preset) in self.defaults.presets() {
            if let Err(e) = parse_preset(preset) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Load from disk, writing the defaults first if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailed` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `SaveFailed` if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Unset presets read as `None`, same as unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory without saving.
    ///
    /// The new value must keep the existing type and pass [`Config::validate`];
    /// on error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKey` or `InvalidValue`.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value is invalid,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// All leaf keys with their values, in declaration order.
    pub fn entries(&self) -> Vec<(String, Option<String>)> {
        let mut out = vec![
            ("cycle.length_minutes".to_string(), Some(self.cycle.length_minutes.to_string())),
            ("cycle.count".to_string(), Some(self.cycle.count.to_string())),
            ("ranking.per_tier_cap".to_string(), Some(self.ranking.per_tier_cap.to_string())),
        ];
        out.extend(
            self.defaults
                .presets()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.map(str::to_string))),
        );
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.cycle.length_minutes, 90);
        assert_eq!(parsed.cycle.count, 6);
        assert_eq!(parsed.ranking.per_tier_cap, 3);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[cycle]\nlength_minutes = 100\n").unwrap();
        assert_eq!(parsed.cycle.length_minutes, 100);
        assert_eq!(parsed.cycle.count, 6);
        assert_eq!(parsed.ranking.per_tier_cap, 3);
        assert!(parsed.defaults.bedtime.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cycle.length_minutes").as_deref(), Some("90"));
        assert_eq!(cfg.get("ranking.per_tier_cap").as_deref(), Some("3"));
        assert!(cfg.get("cycle.missing_key").is_none());
        assert!(cfg.get("defaults.bedtime").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_number_and_preset() {
        let mut cfg = Config::default();
        cfg.apply("cycle.length_minutes", "100").unwrap();
        cfg.apply("defaults.bedtime", "22:30").unwrap();
        assert_eq!(cfg.cycle.length_minutes, 100);
        assert_eq!(cfg.get("defaults.bedtime").as_deref(), Some("22:30"));
        assert_eq!(cfg.defaults.bedtime().unwrap(), NaiveTime::from_hms_opt(22, 30, 0));

        cfg.apply("defaults.bedtime", "").unwrap();
        assert!(cfg.defaults.bedtime.is_none());
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("cycle.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
        let err = cfg.apply("cycle", "1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn apply_rejects_invalid_values_and_keeps_state() {
        let mut cfg = Config::default();
        assert!(cfg.apply("cycle.length_minutes", "ninety").is_err());
        assert!(cfg.apply("cycle.length_minutes", "0").is_err());
        assert!(cfg.apply("cycle.count", "-1").is_err());
        assert!(cfg.apply("defaults.work_time", "7am").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn apply_rejects_oversized_cycle_values() {
        let mut cfg = Config::default();
        let err = cfg.apply("cycle.length_minutes", "10000000000000").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "cycle.length_minutes"));
        let err = cfg.apply("cycle.count", "1000000000000").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "cycle.count"));
        assert_eq!(cfg, Config::default());

        cfg.apply("cycle.length_minutes", "1440").unwrap();
        cfg.apply("cycle.count", "24").unwrap();
        assert_eq!((cfg.cycle.length_minutes, cfg.cycle.count), (1440, 24));
    }

    #[test]
    fn prayer_window_needs_both_ends() {
        let mut cfg = Config::default();
        cfg.apply("defaults.prayer_window_start", "05:00").unwrap();
        assert_eq!(cfg.defaults.prayer_window().unwrap(), None);
        cfg.apply("defaults.prayer_window_end", "05:40").unwrap();
        let (start, end) = cfg.defaults.prayer_window().unwrap().unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(5, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(5, 40, 0).unwrap());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.apply("defaults.work_time", "06:45").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.defaults.work_time.as_deref(), Some("06:45"));
    }

    #[test]
    fn malformed_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cycle\nlength_minutes = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Config(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn entries_list_every_leaf() {
        let cfg = Config::default();
        let entries = cfg.entries();
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[0], ("cycle.length_minutes".to_string(), Some("90".to_string())));
        assert!(entries.iter().any(|(k, v)| k == "defaults.must_wake_by" && v.is_none()));
    }
}
