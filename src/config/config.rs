use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable consulted before the config file for the API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the financial-data API.
    pub base_url: String,

    /// Ticker fetched when none is given on the command line.
    pub ticker: String,

    /// Reporting period passed to the endpoint.
    pub period: String,

    /// API key fallback; the FMP_API_KEY environment variable wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per grid page.
    pub page_size: usize,

    /// Show a row-number column in the grid.
    pub show_row_numbers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Directory CSV exports are written to; current directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://financialmodelingprep.com".to_string(),
            ticker: "AAPL".to_string(),
            period: "annual".to_string(),
            api_key: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            show_row_numbers: false,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self { export_dir: None }
    }
}

impl Config {
    /// Load config from the default location, creating it on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("could not determine config directory"))?;

        Ok(config_dir.join("fingrid").join("config.toml"))
    }

    /// API key from the environment, falling back to the config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        self.api
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "no API key: set {} or add api_key under [api] in {}",
                    API_KEY_ENV,
                    Self::get_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                )
            })
    }

    /// Create a default config file with comments.
    pub fn create_default_with_comments() -> String {
        r#"# fingrid configuration file
# Location: ~/.config/fingrid/config.toml (Linux/macOS)
#           %APPDATA%\fingrid\config.toml (Windows)

[api]
# Base URL of the financial-data API
base_url = "https://financialmodelingprep.com"

# Ticker fetched when none is given on the command line
ticker = "AAPL"

# Reporting period requested from the endpoint
period = "annual"

# API key fallback. The FMP_API_KEY environment variable takes precedence.
# api_key = "your-key-here"

[display]
# Rows shown per grid page
page_size = 5

# Show a row-number column in the grid
show_row_numbers = false

[behavior]
# Directory CSV exports are written to (defaults to the current directory)
# export_dir = "/path/to/exports"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.ticker, "AAPL");
        assert_eq!(config.api.period, "annual");
        assert_eq!(config.display.page_size, 5);
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.api.base_url, parsed.api.base_url);
        assert_eq!(config.display.page_size, parsed.display.page_size);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[display]\npage_size = 10\n").unwrap();
        assert_eq!(parsed.display.page_size, 10);
        assert_eq!(parsed.api.ticker, "AAPL");
    }

    #[test]
    fn test_commented_default_parses() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed.api.period, "annual");
        assert_eq!(parsed.display.page_size, 5);
    }
}
