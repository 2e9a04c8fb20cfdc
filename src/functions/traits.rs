use crate::error::Result;
use crate::functions::params::IndicatorParams;
use crate::types::{IndicatorKind, IndicatorSeries, PricePoint};

/// Base trait for all indicators
pub trait IndicatorFunction: Send + Sync {
    /// Display name
    fn ui_name(&self) -> &'static str;

    fn kind(&self) -> IndicatorKind;

    /// Drawn on the same price axis as the candles
    fn is_overlay(&self) -> bool;

    /// Number of price points needed before the first value is emitted
    fn min_points(&self, params: &IndicatorParams) -> usize {
        params.period
    }

    /// Pure computation over an ordered price series. Too few points yields
    /// an empty series; errors only come from the frame engine.
    fn compute(&self, prices: &[PricePoint], params: &IndicatorParams) -> Result<IndicatorSeries>;
}
