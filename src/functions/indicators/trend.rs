use super::frame::{line_points, price_frame, trailing_window, CLOSE, INDEX};
use crate::{
    error::Result,
    functions::{params::IndicatorParams, traits::IndicatorFunction},
    types::{IndicatorKind, IndicatorSeries, PricePoint, SeriesPoint},
};
use polars::prelude::*;

const VALUE: &str = "value";

/// Mean of the trailing `period` closes, emitted from index `period - 1`.
pub fn simple_moving_average(prices: &[PricePoint], period: usize) -> Result<Vec<SeriesPoint>> {
    if period == 0 || prices.len() < period {
        return Ok(Vec::new());
    }

    let df = price_frame(prices)?
        .select([col(INDEX), col(CLOSE).rolling_mean(trailing_window(period)).alias(VALUE)])
        .collect()?;
    line_points(&df, VALUE)
}

/// Exponential moving average seeded with the first close.
///
/// The recurrence runs from index 0, but values are only emitted from
/// index `period - 1` so the line starts where the SMA of the same period
/// does.
pub fn exponential_moving_average(prices: &[PricePoint], period: usize) -> Result<Vec<SeriesPoint>> {
    if period == 0 || prices.len() < period {
        return Ok(Vec::new());
    }

    let options = EWMOptions {
        alpha: 2.0 / (period as f64 + 1.0),
        adjust: false,
        min_periods: period,
        ..Default::default()
    };
    let df = price_frame(prices)?
        .select([col(INDEX), col(CLOSE).ewm_mean(options).alias(VALUE)])
        .collect()?;
    line_points(&df, VALUE)
}

// --- SMA ---
pub struct SMA;

impl IndicatorFunction for SMA {
    fn ui_name(&self) -> &'static str {
        "Simple Moving Average"
    }
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma
    }
    fn is_overlay(&self) -> bool {
        true
    }
    fn compute(&self, prices: &[PricePoint], params: &IndicatorParams) -> Result<IndicatorSeries> {
        Ok(IndicatorSeries::Line(simple_moving_average(prices, params.period)?))
    }
}

// --- EMA ---
pub struct EMA;

impl IndicatorFunction for EMA {
    fn ui_name(&self) -> &'static str {
        "Exponential Moving Average"
    }
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }
    fn is_overlay(&self) -> bool {
        true
    }
    fn compute(&self, prices: &[PricePoint], params: &IndicatorParams) -> Result<IndicatorSeries> {
        Ok(IndicatorSeries::Line(exponential_moving_average(prices, params.period)?))
    }
}
