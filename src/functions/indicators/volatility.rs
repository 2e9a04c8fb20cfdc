use super::frame::{band_points, price_frame, trailing_window, CLOSE, INDEX};
use crate::{
    error::Result,
    functions::{params::IndicatorParams, traits::IndicatorFunction},
    types::{BandPoint, IndicatorKind, IndicatorSeries, PricePoint},
};
use polars::prelude::*;

/// Bollinger Bands over the trailing `period` closes.
///
/// Uses the population standard deviation (ddof 0, divide by `period`).
pub fn bollinger_bands(prices: &[PricePoint], period: usize, std_dev_multiplier: f64) -> Result<Vec<BandPoint>> {
    if period == 0 || prices.len() < period {
        return Ok(Vec::new());
    }

    let population = RollingOptionsFixedWindow {
        fn_params: Some(RollingFnParams::Var(RollingVarParams { ddof: 0 })),
        ..trailing_window(period)
    };
    let middle = col(CLOSE).rolling_mean(trailing_window(period));
    let width = lit(std_dev_multiplier) * col(CLOSE).rolling_std(population);

    let df = price_frame(prices)?
        .select([
            col(INDEX),
            middle.clone().alias("middle"),
            (middle.clone() + width.clone()).alias("upper"),
            (middle - width).alias("lower"),
        ])
        .collect()?;
    band_points(&df, "middle", "upper", "lower")
}

// --- Bollinger Bands ---
pub struct BollingerBands;

impl IndicatorFunction for BollingerBands {
    fn ui_name(&self) -> &'static str {
        "Bollinger Bands"
    }
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::BollingerBands
    }
    fn is_overlay(&self) -> bool {
        true
    }
    fn compute(&self, prices: &[PricePoint], params: &IndicatorParams) -> Result<IndicatorSeries> {
        let multiplier = params.std_dev_multiplier().unwrap_or(2.0);
        Ok(IndicatorSeries::Bands(bollinger_bands(prices, params.period, multiplier)?))
    }
}
