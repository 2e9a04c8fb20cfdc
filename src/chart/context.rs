use crate::data::{IndicatorCache, IndicatorStore, PriceSource};
use crate::error::{Result, TradechartError};
use crate::functions::{FunctionRegistry, IndicatorSpec};
use crate::types::IndicatorSeries;
use std::sync::Arc;

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Computed,
}

/// Collaborators shared by every indicator of a session.
pub struct IndicatorContext {
    cache: IndicatorCache,
    prices: Arc<dyn PriceSource>,
    registry: FunctionRegistry,
}

impl IndicatorContext {
    pub fn new(store: Arc<dyn IndicatorStore>, prices: Arc<dyn PriceSource>) -> Self {
        Self {
            cache: IndicatorCache::new(store),
            prices,
            registry: FunctionRegistry::new(),
        }
    }

    pub fn cache(&self) -> &IndicatorCache {
        &self.cache
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Cache-or-compute for one spec.
    ///
    /// A hit never touches the price source. On a miss the full series is
    /// fetched, computed and written back in one transaction; a failed write is
    /// logged and the computed series is still returned. Only a price
    /// source failure is an error.
    pub fn series_for(&self, spec: &IndicatorSpec) -> Result<(IndicatorSeries, CacheStatus)> {
        let key = spec.cache_key();
        match self.cache.get(&key) {
            Ok(Some(series)) => return Ok((series, CacheStatus::Hit)),
            Ok(None) => {}
            Err(e) => log::warn!("Cache read failed for {}: {}; recomputing", key.storage_id(), e),
        }

        let function = self.registry.get(spec.kind)?;
        let prices = self.prices.closes(&spec.symbol, spec.timeframe).map_err(|e| match e {
            TradechartError::PriceSource(_) => e,
            other => TradechartError::PriceSource(other.to_string()),
        })?;

        log::info!(
            "Calculating {} for {} {} over {} closes",
            spec.kind,
            spec.symbol,
            spec.timeframe,
            prices.len()
        );
        let series = function.compute(&prices, &spec.params)?;

        if series.is_empty() {
            let reason = TradechartError::InsufficientData {
                required: function.min_points(&spec.params),
                available: prices.len(),
            };
            log::info!("{} {} {}: {}", spec.kind, spec.symbol, spec.timeframe, reason);
        } else if let Err(e) = self.cache.set(&key, &series) {
            log::warn!("{}", e);
        }

        Ok((series, CacheStatus::Computed))
    }
}
