//! TOML-based landing page configuration.
//!
//! Stores:
//! - Countdown lead time and tick interval
//! - Signup toast messages, colours and display duration
//! - Scroll-reveal threshold
//!
//! Configuration is stored at `~/.config/hattika/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Days between first visit and the generated launch date.
    #[serde(default = "default_lead_days")]
    pub lead_days: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Signup form configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    #[serde(default = "default_success_message")]
    pub success_message: String,
    #[serde(default = "default_error_message")]
    pub error_message: String,
    #[serde(default = "default_success_color")]
    pub success_color: String,
    #[serde(default = "default_error_color")]
    pub error_color: String,
}

/// Scroll-reveal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// `false` behaves like a browser without IntersectionObserver.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hattika/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

fn default_lead_days() -> u32 {
    90
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_toast_duration_ms() -> u64 {
    4000
}
fn default_success_message() -> String {
    "You're on the list! We'll notify you at launch. ✦".into()
}
fn default_error_message() -> String {
    "Please enter a valid email address.".into()
}
fn default_success_color() -> String {
    "var(--accent)".into()
}
fn default_error_color() -> String {
    "#c0392b".into()
}
fn default_true() -> bool {
    true
}
fn default_threshold() -> f64 {
    0.15
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            lead_days: default_lead_days(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            success_message: default_success_message(),
            error_message: default_error_message(),
            success_color: default_success_color(),
            error_color: default_error_color(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_threshold(),
        }
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(n) if n.is_f64() => value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot overwrite a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
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
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the existing type, or the resulting config is out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "countdown.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::InvalidValue {
                key: "reveal.threshold".into(),
                message: "must be between 0 and 1".into(),
            });
        }
        Ok(())
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
        assert_eq!(parsed.countdown.lead_days, 90);
        assert_eq!(parsed.notify.toast_duration_ms, 4000);
        assert_eq!(parsed.reveal.threshold, 0.15);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[countdown]\nlead_days = 30\n").unwrap();
        assert_eq!(parsed.countdown.lead_days, 30);
        assert_eq!(parsed.countdown.tick_interval_ms, 1000);
        assert_eq!(parsed.notify.error_color, "#c0392b");
        assert!(parsed.reveal.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("countdown.lead_days").as_deref(), Some("90"));
        assert_eq!(cfg.get("reveal.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("notify.success_color").as_deref(), Some("var(--accent)"));
        assert!(cfg.get("countdown.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_integer_float_bool_and_string() {
        let mut cfg = Config::default();
        cfg.set("countdown.lead_days", "30").unwrap();
        cfg.set("reveal.threshold", "0.5").unwrap();
        cfg.set("reveal.enabled", "false").unwrap();
        cfg.set("notify.error_color", "#ff0000").unwrap();
        assert_eq!(cfg.countdown.lead_days, 30);
        assert_eq!(cfg.reveal.threshold, 0.5);
        assert!(!cfg.reveal.enabled);
        assert_eq!(cfg.notify.error_color, "#ff0000");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("countdown.nonexistent", "1").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
        assert!(cfg.set("countdown", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("reveal.enabled", "not_a_bool").is_err());
        assert!(cfg.set("countdown.lead_days", "ninety").is_err());
        assert_eq!(cfg.countdown.lead_days, 90);
    }

    #[test]
    fn set_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("reveal.threshold", "1.5").is_err());
        assert!(cfg.set("countdown.tick_interval_ms", "0").is_err());
        assert_eq!(cfg.reveal.threshold, 0.15);
        assert_eq!(cfg.countdown.tick_interval_ms, 1000);
    }

    #[test]
    fn load_from_creates_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.countdown.lead_days, 90);

        let mut cfg = cfg;
        cfg.set("countdown.lead_days", "7").unwrap();
        cfg.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.countdown.lead_days, 7);
    }

    #[test]
    fn load_from_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "countdown = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
