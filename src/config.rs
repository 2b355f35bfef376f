// Configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::models::AppConfig;
use crate::provider::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Overrides `api_url` from the config file.
pub const API_URL_ENV: &str = "UIFORGE_API_URL";

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("uiforge");

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    Ok(config_dir)
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn get_log_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("uiforge.log"))
}

pub fn load_config() -> Result<AppConfig> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        let contents = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&contents).context("Failed to parse config file")?
    } else {
        let default_config = AppConfig::default();
        save_config(&default_config)?;
        default_config
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let config_path = get_config_path()?;

    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&config_path, contents).context("Failed to write config file")?;

    Ok(())
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
        config.api_url = url.trim().trim_end_matches('/').to_string();
    }
}

/// Settings for `uiforge-server`, read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub provider_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            provider_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => defaults.port,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port,
            api_key: non_empty("GENAI_API_KEY"),
            model: non_empty("GENAI_MODEL").unwrap_or(defaults.model),
            provider_base_url: non_empty("GENAI_BASE_URL").unwrap_or(defaults.provider_base_url),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_config_creates_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();

        let original_home = std::env::var("HOME").ok();
        let original_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("HOME", temp_dir.path());
        std::env::remove_var("XDG_CONFIG_HOME");
        std::env::remove_var(API_URL_ENV);

        let config = load_config();

        if let Some(home) = &original_home {
            std::env::set_var("HOME", home);
        } else {
            std::env::remove_var("HOME");
        }
        if let Some(xdg) = &original_xdg {
            std::env::set_var("XDG_CONFIG_HOME", xdg);
        }

        assert!(
            config.is_ok(),
            "Config loading failed: {:?}. HOME was set to: {:?}",
            config.as_ref().err(),
            temp_dir.path()
        );
        assert_eq!(config.unwrap().api_url, "http://localhost:5000");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".config/uiforge");
        fs::create_dir_all(&config_dir).unwrap();

        let config = AppConfig {
            api_url: "http://custom:8080".to_string(),
            ..Default::default()
        };

        let config_path = config_dir.join("config.toml");
        fs::write(&config_path, toml::to_string(&config).unwrap()).unwrap();

        let loaded: AppConfig = toml::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(loaded.api_url, "http://custom:8080");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let loaded: AppConfig = toml::from_str("api_url = \"http://proxy:9000\"\n").unwrap();
        assert_eq!(loaded.api_url, "http://proxy:9000");
        assert_eq!(loaded.request_timeout, 600);
        assert_eq!(loaded.progress.reset_delay_ms, 1000);
    }

    #[test]
    fn test_env_override_of_api_url() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, lookup_from(&[(API_URL_ENV, "http://remote:7000/ ")]));
        assert_eq!(config.api_url, "http://remote:7000");

        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, lookup_from(&[(API_URL_ENV, "  ")]));
        assert_eq!(config.api_url, "http://localhost:5000");
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_server_config_from_env_values() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("GENAI_API_KEY", "abc123"),
            ("PORT", "8081"),
            ("HOST", "0.0.0.0"),
            ("GENAI_MODEL", "gemini-pro"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8081");
        assert_eq!(config.model, "gemini-pro");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = ServerConfig::from_lookup(lookup_from(&[("GENAI_API_KEY", "   ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config);
        assert!(serialized.is_ok());

        let deserialized: Result<AppConfig, _> = toml::from_str(&serialized.unwrap());
        assert!(deserialized.is_ok());
    }
}
