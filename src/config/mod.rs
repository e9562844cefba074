use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{
    core::utils::{ensure_dir, with_suffix, PathResolver},
    domain::filter::TimeWindow,
    errors::Result,
};

pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger file, relative to the data directory unless absolute.
    pub ledger_file: String,
    pub currency: String,
    pub default_window: TimeWindow,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: DEFAULT_LEDGER_FILE.into(),
            currency: "USD".into(),
            default_window: TimeWindow::AllTime,
        }
    }
}

impl Config {
    pub fn ledger_path(&self, base: &Path) -> PathBuf {
        PathResolver::ledger_file_in(base, &self.ledger_file)
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Returns the stored configuration, or defaults when the file is
    /// missing or unreadable.
    pub fn load(&self) -> Config {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return Config::default(),
        };
        serde_json::from_str(&data).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "ignoring malformed config");
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = with_suffix(&self.path, TMP_SUFFIX);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load(), Config::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            ledger_file: "household.csv".into(),
            currency: "EUR".into(),
            default_window: TimeWindow::Last3Months,
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load(), config);
        assert_eq!(
            config.ledger_path(manager.base_dir()),
            temp.path().join("household.csv")
        );
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert_eq!(manager.load(), Config::default());
    }

    #[test]
    fn partial_config_fills_missing_fields() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "currency": "GBP" }"#).unwrap();
        let config = manager.load();
        assert_eq!(config.currency, "GBP");
        assert_eq!(config.ledger_file, DEFAULT_LEDGER_FILE);
    }
}
