use crate::error::{Result, TradechartError};
use crate::types::{PricePoint, Timeframe};
use polars::prelude::*;
use super::{csv::CsvConnector, types::PriceColumn, validator::DataValidator};
use std::collections::HashMap;

/// Ordered close prices for a (symbol, timeframe).
///
/// An unknown symbol or timeframe is a valid empty result, not an error.
pub trait PriceSource: Send + Sync {
    fn closes(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>>;
}

/// In-process price series, keyed by symbol and timeframe.
#[derive(Debug, Default)]
pub struct MemoryPriceSource {
    series: HashMap<(String, Timeframe), Vec<PricePoint>>,
}

impl MemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, timeframe: Timeframe, points: Vec<PricePoint>) -> Result<()> {
        DataValidator::validate_ordering(&points)?;
        self.series.insert((symbol.to_string(), timeframe), points);
        Ok(())
    }

    /// Inserts closes with sequence indices 0, 1, 2, ...
    pub fn insert_closes(&mut self, symbol: &str, timeframe: Timeframe, closes: &[f64]) {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(i as i64, close))
            .collect();
        self.series.insert((symbol.to_string(), timeframe), points);
    }
}

impl PriceSource for MemoryPriceSource {
    fn closes(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        Ok(self
            .series
            .get(&(symbol.to_string(), timeframe))
            .cloned()
            .unwrap_or_default())
    }
}

/// Prices backed by a DataFrame with symbol / timeframe / date / close columns.
///
/// Rows are filtered on (symbol, timeframe tag), sorted by date, and numbered
/// by position, so the sequence index is the bar ordinal.
pub struct FramePriceSource {
    frame: DataFrame,
}

impl FramePriceSource {
    pub fn new(frame: DataFrame) -> Result<Self> {
        let frame = CsvConnector::normalize_columns(frame)?;
        Ok(Self { frame })
    }

    pub fn from_csv<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::new(CsvConnector::load(path)?)
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

impl PriceSource for FramePriceSource {
    fn closes(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        let symbols = self.frame.column(PriceColumn::Symbol.as_str())?.cast(&DataType::String)?;
        let timeframes = self.frame.column(PriceColumn::Timeframe.as_str())?.cast(&DataType::String)?;
        let mask = &symbols.str()?.equal(symbol) & &timeframes.str()?.equal(timeframe.tag());

        let filtered = self
            .frame
            .filter(&mask)
            .map_err(|e| TradechartError::PriceSource(format!("Filter failed for {} {}: {}", symbol, timeframe, e)))?;
        if filtered.height() == 0 {
            return Ok(Vec::new());
        }

        let sorted = filtered.sort([PriceColumn::Date.as_str()], SortMultipleOptions::default())?;
        let close = sorted.column(PriceColumn::Close.as_str())?.cast(&DataType::Float64)?;
        let close = close.f64()?;

        let points: Vec<PricePoint> = close
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, c)| PricePoint::new(i as i64, c))
            .collect();
        log::debug!("Fetched {} closes for {} {}", points.len(), symbol, timeframe);
        Ok(points)
    }
}
