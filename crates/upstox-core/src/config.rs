//! Application configuration management.
//!
//! Holds the locations of the token file and the stock directory, the
//! exchanges reported by the market status tools, and an optional API base
//! URL override.
//!
//! Configuration is stored at `~/.config/upstox-bridge/config.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::API_BASE_URL;
use crate::auth::DEFAULT_TOKEN_FILE;
use crate::stocks::DEFAULT_STOCK_FILE;

/// Application name used for config directory paths
const APP_NAME: &str = "upstox-bridge";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub token_file: Option<PathBuf>,
    pub stock_data_file: Option<PathBuf>,
    pub market_exchanges: Vec<String>,
    pub api_base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn token_path(&self) -> PathBuf {
        self.token_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE))
    }

    pub fn stock_data_path(&self) -> PathBuf {
        self.stock_data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STOCK_FILE))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(API_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.token_path(), PathBuf::from("upstox_token.json"));
        assert_eq!(config.stock_data_path(), PathBuf::from("categorized_stocks.json"));
        assert_eq!(config.api_base_url(), "https://api.upstox.com");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            token_file: Some(PathBuf::from("/tmp/token.json")),
            stock_data_file: None,
            market_exchanges: vec!["NSE".to_string(), "MCX".to_string()],
            api_base_url: Some("http://127.0.0.1:9000".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.token_path(), PathBuf::from("/tmp/token.json"));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"market_exchanges": ["NFO"]}"#).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.market_exchanges, vec!["NFO".to_string()]);
        assert_eq!(loaded.token_file, None);
    }
}
