//! Server configuration
//!
//! Defaults, then an optional TOML or JSON file named by `BASKET_CONFIG`,
//! then `BASKET_ADDR` / `BASKET_DATA` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use basket_core::MiningConfig;

use crate::error::{Result, ServerError};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "BASKET_CONFIG";
/// Environment variable overriding the listen address
pub const ADDR_ENV: &str = "BASKET_ADDR";
/// Environment variable overriding the transaction log path
pub const DATA_ENV: &str = "BASKET_DATA";

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Transaction log (JSON) loaded at startup
    pub data_path: PathBuf,
    /// Wall-clock budget for one season's analysis
    pub compute_timeout_ms: u64,
    pub mining: MiningConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
            data_path: PathBuf::from("data.json"),
            compute_timeout_ms: 10_000,
            mining: MiningConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load from a file, choosing the format by extension (`.json` or TOML)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_toml(&contents),
        }
    }

    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                tracing::info!("Loading config from {}", path);
                Self::from_file(path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(
            std::env::var(ADDR_ENV).ok(),
            std::env::var(DATA_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Replace the address and data path when given
    pub fn apply_overrides(&mut self, addr: Option<String>, data_path: Option<String>) {
        if let Some(addr) = addr {
            self.addr = addr;
        }
        if let Some(path) = data_path {
            self.data_path = PathBuf::from(path);
        }
    }

    pub fn compute_budget(&self) -> Duration {
        Duration::from_millis(self.compute_timeout_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.compute_timeout_ms == 0 {
            return Err(ServerError::Config(
                "compute_timeout_ms must be greater than zero".to_string(),
            ));
        }
        self.mining.validate().map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{MiningMode, RulePopulation};

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:5000");
        assert_eq!(config.mining.min_support, 10);
        assert_eq!(config.compute_budget(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_nested_mining() {
        let config = ServerConfig::from_toml(
            r#"
            addr = "0.0.0.0:8080"
            compute_timeout_ms = 2500

            [mining]
            min_support = 3
            mode = "apriori"
            rule_population = "selected"
            "#,
        )
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.data_path, PathBuf::from("data.json"));
        assert_eq!(config.mining.min_support, 3);
        assert_eq!(config.mining.mode, MiningMode::Apriori);
        assert_eq!(config.mining.rule_population, RulePopulation::Selected);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basket.json");
        std::fs::write(&path, r#"{"data_path": "/srv/tx.json"}"#).unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/tx.json"));
    }

    #[test]
    fn test_overrides() {
        let mut config = ServerConfig::default();
        config.apply_overrides(Some("127.0.0.1:9999".to_string()), None);
        assert_eq!(config.addr, "127.0.0.1:9999");
        assert_eq!(config.data_path, PathBuf::from("data.json"));
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = ServerConfig {
            compute_timeout_ms: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_validate_reports_mining_range_as_config_error() {
        let config = ServerConfig::from_toml("[mining]\nmin_confidence = 1.5").unwrap();
        match config.validate() {
            Err(ServerError::Config(msg)) => assert!(msg.contains("min_confidence")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
