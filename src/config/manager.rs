use super::{
    chart::ChartConfig,
    logging::LoggingConfig,
    storage::StorageConfig,
    traits::ConfigSection,
};
use crate::error::TradechartError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `TRADECHART__STORAGE__PATH`.
pub const ENV_PREFIX: &str = "TRADECHART";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TradechartError> {
        self.storage.validate()?;
        self.chart.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradechartError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TradechartError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| TradechartError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    /// Optional TOML file, then `TRADECHART__SECTION__FIELD` environment overrides.
    pub fn load_layered<P: AsRef<Path>>(&self, path: Option<P>) -> Result<(), TradechartError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| TradechartError::Configuration(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradechartError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| TradechartError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| TradechartError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Applies `f` to a copy and only keeps it if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), TradechartError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = config.clone();
        f(&mut next);
        next.validate()?;
        *config = next;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::storage::StorageBackend;
    use crate::types::Timeframe;

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tradechart.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.chart.default_timeframe = Timeframe::Hourly;
                c.storage.backend = StorageBackend::Memory;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().chart.default_timeframe, Timeframe::Hourly);
        assert_eq!(reloaded.get().storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[chart]\ndefault_period = 50\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();
        assert_eq!(config.chart.default_period, 50);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_invalid_update_is_discarded() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.chart.default_period = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().chart.default_period, 20);
    }

    #[test]
    fn test_layered_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new();
        manager.load_layered(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(manager.get().chart.default_timeframe, Timeframe::Daily);
    }
}
