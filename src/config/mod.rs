use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::autosave::DEFAULT_AUTOSAVE_INTERVAL_SECS,
    currency::CurrencyFormat,
    errors::LedgerError,
    storage::json_backend::write_atomic,
    utils::paths::{app_data_dir, config_file_in, ensure_dir, snapshot_file_in},
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub currency: CurrencyFormat,
    #[serde(default = "Config::default_autosave_interval")]
    pub autosave_interval_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            snapshot_file: None,
        }
    }
}

impl Config {
    fn default_autosave_interval() -> u64 {
        DEFAULT_AUTOSAVE_INTERVAL_SECS
    }
}

/// Loads and saves `config.json` inside the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// Reads the configuration, falling back to defaults when no file exists.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("`{}` is not valid: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension(format!("json.{TMP_SUFFIX}"));
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Snapshot location: the configured override or `ledger.json` next to the config.
    pub fn snapshot_path(&self, config: &Config) -> PathBuf {
        config
            .snapshot_file
            .clone()
            .unwrap_or_else(|| snapshot_file_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.autosave_interval_secs, 30);
        assert_eq!(
            manager.snapshot_path(&config),
            dir.path().join("ledger.json")
        );
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            autosave_interval_secs: 5,
            snapshot_file: Some(dir.path().join("custom.json")),
            ..Config::default()
        };
        manager.save(&config).unwrap();

        assert!(manager.path().exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "autosave_interval_secs": 10 }"#).unwrap();

        let config = manager.load().unwrap();
        assert_eq!(config.autosave_interval_secs, 10);
        assert_eq!(config.currency, CurrencyFormat::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "not json").unwrap();
        assert!(matches!(manager.load(), Err(LedgerError::Config(_))));
    }
}
