pub mod cache;
pub mod connectors;
pub mod store;

pub use cache::{CacheKey, IndicatorCache};
pub use connectors::{CsvConnector, FramePriceSource, MemoryPriceSource, PriceSource};
pub use store::{open_store, DuckDbStore, IndicatorStore, MemoryStore, PresetRow, StoredSeries};
