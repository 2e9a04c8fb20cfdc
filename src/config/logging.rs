use super::traits::ConfigSection;
use crate::error::TradechartError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter, e.g. `info` or `tradechart=debug`. `RUST_LOG` wins.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl ConfigSection for LoggingConfig {
    fn validate(&self) -> Result<(), TradechartError> {
        if self.filter.trim().is_empty() {
            return Err(TradechartError::Configuration(
                "Logging filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
