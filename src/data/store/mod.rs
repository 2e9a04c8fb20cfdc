mod database;
mod memory;

pub use database::DuckDbStore;
pub use memory::MemoryStore;

use crate::config::storage::{StorageBackend, StorageConfig};
use crate::data::cache::CacheKey;
use crate::error::Result;
use crate::types::IndicatorSeries;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One cached series as it was read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSeries {
    /// Point count recorded when the entry was written.
    pub points: usize,
    pub computed_at: DateTime<Utc>,
    pub series: IndicatorSeries,
}

/// One persisted preset row. `row` orders indicators within a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetRow {
    pub user_id: String,
    pub slot: usize,
    pub row: usize,
    pub symbol: String,
    pub kind: String,
    pub params: String,
}

/// Typed persistence for cached series and preset rows.
///
/// Every write is a single transaction: readers see all of it or none.
pub trait IndicatorStore: Send + Sync {
    /// The entry for `key`, or `None` when no metadata row exists.
    fn load_series(&self, key: &CacheKey) -> Result<Option<StoredSeries>>;

    /// Replaces the entry for `key` with `series`.
    fn save_series(&self, key: &CacheKey, series: &IndicatorSeries, computed_at: DateTime<Utc>) -> Result<()>;

    /// Drops every cached series of `symbol`.
    fn delete_symbol_series(&self, symbol: &str) -> Result<()>;

    /// Preset rows of one user and symbol, ordered by slot then row.
    fn load_presets(&self, user_id: &str, symbol: &str) -> Result<Vec<PresetRow>>;

    /// Deletes every preset row of the user and symbol and inserts `rows`.
    fn replace_presets(&self, user_id: &str, symbol: &str, rows: &[PresetRow]) -> Result<()>;
}

pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn IndicatorStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::DuckDb => Ok(Arc::new(DuckDbStore::open(&config.path)?)),
    }
}
