//! Configuration file support for Reclaim.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/reclaim/config.toml`.

use crate::{CostConfig, Error, Result, Substance};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    /// Per-day spend overrides, keyed by substance (cigarettes, vape,
    /// cannabis, alcohol). Unknown keys are ignored with a warning.
    #[serde(default)]
    pub costs: HashMap<String, f64>,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Display preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("reclaim")
}

fn default_currency() -> String {
    "$".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("reclaim").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// The cost overrides in the form the analytics aggregator consumes
    ///
    /// Keys that don't name a known substance are dropped with a warning.
    pub fn cost_config(&self) -> CostConfig {
        let mut costs = CostConfig::new();
        for (key, &value) in &self.costs {
            match Substance::from_key(key) {
                Some(substance) => {
                    costs.insert(substance, value);
                }
                None => {
                    tracing::warn!("Ignoring cost override for unknown substance '{}'", key);
                }
            }
        }
        costs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.costs.is_empty());
        assert_eq!(config.display.currency, "$");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.costs.insert("cigarettes".into(), 9.5);

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.costs.get("cigarettes"), Some(&9.5));
        assert_eq!(parsed.display.currency, config.display.currency);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[costs]
alcohol = 22.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.costs.get("alcohol"), Some(&22.0));
        assert_eq!(config.display.currency, "$"); // default
    }

    #[test]
    fn test_cost_config_drops_unknown_substances() {
        let toml_str = r#"
[costs]
alcohol = 22.0
betel_nut = 3.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let costs = config.cost_config();

        assert_eq!(costs.get(&Substance::Alcohol), Some(&22.0));
        assert_eq!(costs.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.costs.insert("vape".into(), 4.0);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cost_config().get(&Substance::Vape), Some(&4.0));
    }
}
