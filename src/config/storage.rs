use super::traits::ConfigSection;
use crate::error::TradechartError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file for the `duckdb` backend.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    DuckDb,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::DuckDb,
            path: PathBuf::from("tradechart.duckdb"),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn validate(&self) -> Result<(), TradechartError> {
        if self.backend == StorageBackend::DuckDb && self.path.as_os_str().is_empty() {
            return Err(TradechartError::Configuration(
                "Storage path is required for the duckdb backend".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        let config: StorageConfig = toml::from_str("backend = \"duckdb\"\npath = \"data/charts.duckdb\"\n").unwrap();
        assert_eq!(config.backend, StorageBackend::DuckDb);
        assert!(toml::from_str::<StorageConfig>("backend = \"memory\"\n").is_ok());
    }

    #[test]
    fn test_duckdb_requires_path() {
        let config = StorageConfig {
            path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let memory = StorageConfig {
            backend: StorageBackend::Memory,
            path: PathBuf::new(),
        };
        assert!(memory.validate().is_ok());
    }
}
