use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where the history blob is kept (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    pub max_history_items: Option<usize>,
    pub storage_key: Option<String>,
    /// Look titles up via oEmbed when `add` is given none
    pub fetch_titles: Option<bool>,
    pub default_format: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ythistory/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ythistory")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
data_dir = "/tmp/yth"
max_history_items = 20
storage_key = "work-history"
fetch_titles = false
default_format = "json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/yth")));
        assert_eq!(config.max_history_items, Some(20));
        assert_eq!(config.storage_key.as_deref(), Some("work-history"));
        assert_eq!(config.fetch_titles, Some(false));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_parse_empty_config() {
        let toml_str = "";
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.max_history_items.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"max_history_items = 5"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_history_items, Some(5));
        assert!(config.fetch_titles.is_none());
    }
}
