use crate::error::Result;
use crate::types::{BandPoint, PricePoint, SeriesPoint};
use polars::prelude::*;

pub(crate) const INDEX: &str = "index";
pub(crate) const CLOSE: &str = "close";

/// Prices as a lazy frame with an `index` (i64) and a `close` (f64) column.
pub(crate) fn price_frame(prices: &[PricePoint]) -> Result<LazyFrame> {
    let index: Vec<i64> = prices.iter().map(|p| p.index).collect();
    let close: Vec<f64> = prices.iter().map(|p| p.close).collect();
    let df = DataFrame::new(vec![
        Column::new(INDEX.into(), index),
        Column::new(CLOSE.into(), close),
    ])?;
    Ok(df.lazy())
}

/// Trailing window of exactly `period` rows; shorter prefixes are null.
pub(crate) fn trailing_window(period: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: period,
        min_periods: period,
        ..Default::default()
    }
}

/// Non-null rows of `column`, keyed by the source index.
pub(crate) fn line_points(df: &DataFrame, column: &str) -> Result<Vec<SeriesPoint>> {
    let index = df.column(INDEX)?.i64()?;
    let values = df.column(column)?.f64()?;
    Ok(index
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(x, value)| Some(SeriesPoint { x: x?, value: value? }))
        .collect())
}

/// Rows where all three band columns are non-null.
pub(crate) fn band_points(df: &DataFrame, middle: &str, upper: &str, lower: &str) -> Result<Vec<BandPoint>> {
    let index = df.column(INDEX)?.i64()?;
    let middle = df.column(middle)?.f64()?;
    let upper = df.column(upper)?.f64()?;
    let lower = df.column(lower)?.f64()?;
    Ok(index
        .into_iter()
        .zip(middle.into_iter())
        .zip(upper.into_iter().zip(lower.into_iter()))
        .filter_map(|((x, middle), (upper, lower))| {
            Some(BandPoint {
                x: x?,
                middle: middle?,
                upper: upper?,
                lower: lower?,
            })
        })
        .collect())
}
