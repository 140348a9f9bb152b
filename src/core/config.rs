use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_retries() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    250
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Extra attempts for idempotent reads after the first failure.
    #[serde(default = "default_retries")]
    pub retries: usize,
    /// Delay before the first retry; doubles on every further attempt.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            base_url: default_base_url(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Reporting currency. Totals are summed without conversion.
    pub currency: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "fintrack", "fintrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
store:
  base_url: "http://finance.local/api"
  retries: 5
  retry_delay_ms: 100
currency: "USD"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.store.base_url, "http://finance.local/api");
        assert_eq!(config.store.retries, 5);
        assert_eq!(config.store.retry_delay_ms, 100);
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn test_store_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: \"EUR\"\n").unwrap();
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.store.base_url, "http://localhost:8080/api");

        let partial: AppConfig = serde_yaml::from_str(
            r#"
store:
  base_url: "http://example.com/api"
currency: "EUR"
"#,
        )
        .unwrap();
        assert_eq!(partial.store.retries, 3);
        assert_eq!(partial.store.retry_delay_ms, 250);
    }

    #[test]
    fn test_missing_currency_is_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("store:\n  retries: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "currency: \"GBP\"\n")?;
        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.currency, "GBP");

        assert!(AppConfig::load_from_path(file.path().with_extension("missing")).is_err());
        Ok(())
    }
}
