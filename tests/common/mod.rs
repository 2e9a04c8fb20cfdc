#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tradechart::chart::{ChartRenderer, IndicatorContext, IndicatorManager, MemoryChart, SeriesStyle};
use chrono::{DateTime, Utc};
use tradechart::data::{CacheKey, IndicatorStore, MemoryPriceSource, MemoryStore, PresetRow, PriceSource, StoredSeries};
use tradechart::types::{IndicatorSeries, PricePoint, SeriesPoint, Timeframe};
use tradechart::{Result, TradechartError};

pub const SYMBOL: &str = "AAPL";

/// Price source that counts how often it is read.
pub struct CountingPriceSource {
    inner: MemoryPriceSource,
    reads: AtomicUsize,
}

impl CountingPriceSource {
    pub fn new(inner: MemoryPriceSource) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl PriceSource for CountingPriceSource {
    fn closes(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.closes(symbol, timeframe)
    }
}

/// Price source whose every read fails.
pub struct BrokenPriceSource;

impl PriceSource for BrokenPriceSource {
    fn closes(&self, symbol: &str, _timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        Err(TradechartError::PriceSource(format!("no connection for {}", symbol)))
    }
}

/// Wraps a `MemoryChart`, rejecting chosen series ids and counting adds.
pub struct FlakyChart {
    pub inner: MemoryChart,
    pub reject: HashSet<String>,
    pub adds: Vec<String>,
}

impl FlakyChart {
    pub fn new() -> Self {
        Self {
            inner: MemoryChart::new(),
            reject: HashSet::new(),
            adds: Vec::new(),
        }
    }

    pub fn rejecting(ids: &[&str]) -> Self {
        let mut chart = Self::new();
        chart.reject = ids.iter().map(|id| id.to_string()).collect();
        chart
    }
}

impl ChartRenderer for FlakyChart {
    fn add_series(&mut self, id: &str, points: &[SeriesPoint], style: SeriesStyle) -> Result<()> {
        self.adds.push(id.to_string());
        if self.reject.contains(id) {
            return Err(TradechartError::Render {
                series_id: id.to_string(),
                reason: "renderer rejected series".to_string(),
            });
        }
        self.inner.add_series(id, points, style)
    }

    fn remove_series_by_id(&mut self, id: &str) -> bool {
        self.inner.remove_series_by_id(id)
    }

    fn invalidate(&mut self) {
        self.inner.invalidate();
    }
}

/// Store whose writes fail while `fail_writes` is set.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TradechartError::Storage("disk full".to_string()));
        }
        Ok(())
    }
}

impl IndicatorStore for FailingStore {
    fn load_series(&self, key: &CacheKey) -> Result<Option<StoredSeries>> {
        self.inner.load_series(key)
    }

    fn save_series(&self, key: &CacheKey, series: &IndicatorSeries, computed_at: DateTime<Utc>) -> Result<()> {
        self.check()?;
        self.inner.save_series(key, series, computed_at)
    }

    fn delete_symbol_series(&self, symbol: &str) -> Result<()> {
        self.check()?;
        self.inner.delete_symbol_series(symbol)
    }

    fn load_presets(&self, user_id: &str, symbol: &str) -> Result<Vec<PresetRow>> {
        self.inner.load_presets(user_id, symbol)
    }

    fn replace_presets(&self, user_id: &str, symbol: &str, rows: &[PresetRow]) -> Result<()> {
        self.check()?;
        self.inner.replace_presets(user_id, symbol, rows)
    }
}

pub fn closes(values: &[f64]) -> MemoryPriceSource {
    let mut source = MemoryPriceSource::new();
    source.insert_closes(SYMBOL, Timeframe::Daily, values);
    source
}

pub fn ramp(len: usize) -> Vec<f64> {
    (1..=len).map(|i| i as f64).collect()
}

pub fn context(store: Arc<dyn IndicatorStore>, prices: Arc<dyn PriceSource>) -> Arc<IndicatorContext> {
    Arc::new(IndicatorContext::new(store, prices))
}

pub fn memory_manager(prices: MemoryPriceSource) -> IndicatorManager<MemoryChart> {
    let context = context(Arc::new(MemoryStore::new()), Arc::new(prices));
    IndicatorManager::new(MemoryChart::new(), context, SYMBOL, Timeframe::Daily)
}
