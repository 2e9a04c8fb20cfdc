pub mod traits;
pub mod storage;
pub mod chart;
pub mod logging;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use storage::{StorageBackend, StorageConfig};
pub use chart::ChartConfig;
pub use logging::LoggingConfig;
