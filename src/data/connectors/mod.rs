mod csv;
mod price_source;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use price_source::{FramePriceSource, MemoryPriceSource, PriceSource};
pub use types::PriceColumn;
pub use validator::DataValidator;
