//! Runtime configuration.
//!
//! Loaded from an optional TOML file, then overridden by environment variables.
//! The file is `$SCHOLARSHIP_DASHBOARD_CONFIG` when set, otherwise `dashboard.toml`
//! in the working directory if it exists.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::prediction::RenderOptions;
use crate::tabs::{PREDICT_TAB, TABS};

pub const CONFIG_PATH_ENV: &str = "SCHOLARSHIP_DASHBOARD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Optional result sections. Both need a prediction service that sends
/// `scholarship_recommendations` and `model_explanations`; with explanations on,
/// models without one are left out of the breakdown.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub recommendations: bool,
    pub explanations: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig { recommendations: false, explanations: false }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub default_tab: String,
    pub log_level: String,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: "127.0.0.1:8080".to_string(),
            backend_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            default_tab: PREDICT_TAB.to_string(),
            log_level: "info".to_string(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));
        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `DASHBOARD_*` overrides looked up through `lookup`, then validate.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(bind) = lookup("DASHBOARD_BIND") {
            self.bind_address = bind;
        }
        if let Some(url) = lookup("DASHBOARD_BACKEND_URL") {
            self.backend_url = url;
        }
        if let Some(tab) = lookup("DASHBOARD_DEFAULT_TAB") {
            self.default_tab = tab;
        }
        if let Some(level) = lookup("DASHBOARD_LOG") {
            self.log_level = level;
        }
        if let Some(rich) = lookup("DASHBOARD_RICH_RESULTS") {
            let rich = parse_bool("DASHBOARD_RICH_RESULTS", &rich)?;
            self.render = RenderConfig { recommendations: rich, explanations: rich };
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !TABS.contains(&self.default_tab.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "default_tab".to_string(),
                value: self.default_tab.clone(),
            });
        }
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "backend_url".to_string(),
                value: self.backend_url.clone(),
            });
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            recommendations: self.render.recommendations,
            explanations: self.render.explanations,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key: key.to_string(), value: value.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default().with_overrides(env(&[])).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.render_options(), RenderOptions::compact());
    }

    #[test]
    fn file_values_with_partial_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "backend_url = \"http://predictor:5000\"\ndefault_tab = \"dashboard\"\n\n[render]\nrecommendations = true"
        )
        .unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.backend_url, "http://predictor:5000");
        assert_eq!(config.default_tab, "dashboard");
        assert!(config.render.recommendations);
        assert!(!config.render.explanations);
        assert_eq!(config.read_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_address = [").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn env_overrides_win() {
        let config = Config::default()
            .with_overrides(env(&[
                ("DASHBOARD_BIND", "0.0.0.0:9000"),
                ("DASHBOARD_RICH_RESULTS", "on"),
                ("DASHBOARD_DEFAULT_TAB", "models"),
            ]))
            .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.render_options(), RenderOptions::rich());
        assert_eq!(config.default_tab, "models");
    }

    #[test]
    fn rejects_unknown_tab_and_bad_flag() {
        assert!(Config::default().with_overrides(env(&[("DASHBOARD_DEFAULT_TAB", "settings")])).is_err());
        assert!(Config::default().with_overrides(env(&[("DASHBOARD_RICH_RESULTS", "maybe")])).is_err());
        assert!(Config::default().with_overrides(env(&[("DASHBOARD_BACKEND_URL", "predictor:5000")])).is_err());
    }
}
