use super::{IndicatorStore, PresetRow, StoredSeries};
use crate::data::cache::CacheKey;
use crate::error::Result;
use crate::types::IndicatorSeries;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct Tables {
    series: HashMap<String, (String, StoredSeries)>,
    presets: HashMap<(String, String), Vec<PresetRow>>,
}

/// Process-local store; everything is lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached series entries plus preset rows.
    pub fn len(&self) -> usize {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.series.len() + tables.presets.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites the stored point count of an entry, leaving its rows alone.
    #[cfg(test)]
    pub(crate) fn set_recorded_points(&self, key: &CacheKey, points: usize) {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, stored)) = tables.series.get_mut(&key.storage_id()) {
            stored.points = points;
        }
    }
}

impl IndicatorStore for MemoryStore {
    fn load_series(&self, key: &CacheKey) -> Result<Option<StoredSeries>> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.series.get(&key.storage_id()).map(|(_, stored)| stored.clone()))
    }

    fn save_series(&self, key: &CacheKey, series: &IndicatorSeries, computed_at: DateTime<Utc>) -> Result<()> {
        let stored = StoredSeries {
            points: series.len(),
            computed_at,
            series: series.clone(),
        };
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.series.insert(key.storage_id(), (key.symbol.clone(), stored));
        Ok(())
    }

    fn delete_symbol_series(&self, symbol: &str) -> Result<()> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.series.retain(|_, (owner, _)| owner != symbol);
        Ok(())
    }

    fn load_presets(&self, user_id: &str, symbol: &str) -> Result<Vec<PresetRow>> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rows = tables
            .presets
            .get(&(user_id.to_string(), symbol.to_string()))
            .cloned()
            .unwrap_or_default();
        rows.sort_by_key(|row| (row.slot, row.row));
        Ok(rows)
    }

    fn replace_presets(&self, user_id: &str, symbol: &str, rows: &[PresetRow]) -> Result<()> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let owner = (user_id.to_string(), symbol.to_string());
        if rows.is_empty() {
            tables.presets.remove(&owner);
        } else {
            tables.presets.insert(owner, rows.to_vec());
        }
        Ok(())
    }
}
