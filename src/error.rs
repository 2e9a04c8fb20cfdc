use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradechartError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Cache persist error: {0}")]
    CachePersist(String),

    #[error("Preset persist error: {0}")]
    PresetPersist(String),

    #[error("Render error on series '{series_id}': {reason}")]
    Render { series_id: String, reason: String },

    #[error("No indicator with id {0}")]
    NotFound(String),

    #[error("Index {index} out of range 1..={max}")]
    IndexOutOfRange { index: usize, max: usize },

    #[error("Price source error: {0}")]
    PriceSource(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),
}

pub type Result<T> = std::result::Result<T, TradechartError>;
