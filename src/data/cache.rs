use crate::data::store::IndicatorStore;
use crate::error::{Result, TradechartError};
use crate::types::{IndicatorKind, IndicatorSeries, Timeframe};
use chrono::Utc;
use std::sync::Arc;

/// Full parameter tuple that decides whether two computations are the same.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    pub symbol: String,
    pub kind: IndicatorKind,
    pub period: usize,
    pub timeframe: Timeframe,
    /// Band width; `None` for line indicators.
    pub multiplier: Option<f64>,
}

impl CacheKey {
    pub fn new(
        symbol: &str,
        kind: IndicatorKind,
        period: usize,
        timeframe: Timeframe,
        multiplier: Option<f64>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind,
            period,
            timeframe,
            multiplier,
        }
    }

    /// Stable textual id of the entry, unique per key.
    pub fn storage_id(&self) -> String {
        let mut id = format!(
            "{}/{}/{}/{}",
            escape_segment(&self.symbol),
            self.kind.name(),
            self.period,
            self.timeframe.tag()
        );
        if let Some(m) = self.multiplier {
            id.push_str(&format!("/{:?}", m));
        }
        id
    }
}

/// Escapes a free-form id segment so it cannot contain the `/` separator.
fn escape_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

/// Persistent key -> series cache sitting on top of an [`IndicatorStore`].
///
/// Entries are written once and never updated in place; a parameter change
/// produces a different key.
#[derive(Clone)]
pub struct IndicatorCache {
    store: Arc<dyn IndicatorStore>,
}

impl IndicatorCache {
    pub fn new(store: Arc<dyn IndicatorStore>) -> Self {
        Self { store }
    }

    /// Returns `Ok(None)` on a miss, including a metadata row whose point
    /// count does not match the stored rows.
    pub fn get(&self, key: &CacheKey) -> Result<Option<IndicatorSeries>> {
        let Some(stored) = self.store.load_series(key)? else {
            return Ok(None);
        };
        if stored.series.len() != stored.points {
            log::warn!(
                "Cache entry {} has {} rows, expected {}; treating as miss",
                key.storage_id(),
                stored.series.len(),
                stored.points
            );
            return Ok(None);
        }

        log::debug!(
            "Cache hit {} ({} points, computed {})",
            key.storage_id(),
            stored.points,
            stored.computed_at.to_rfc3339()
        );
        Ok(Some(stored.series))
    }

    /// Writes every point plus the metadata row in one transaction.
    pub fn set(&self, key: &CacheKey, series: &IndicatorSeries) -> Result<()> {
        self.store
            .save_series(key, series, Utc::now())
            .map_err(|e| TradechartError::CachePersist(format!("{}: {}", key.storage_id(), e)))
    }

    /// Drops every cached series of `symbol`.
    pub fn invalidate_symbol(&self, symbol: &str) -> Result<()> {
        log::info!("Invalidating cached indicators for {}", symbol);
        self.store.delete_symbol_series(symbol)
    }
}
