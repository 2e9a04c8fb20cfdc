use crate::error::TradechartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One close price at a position in a (symbol, timeframe) series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub index: i64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(index: i64, close: f64) -> Self {
        Self { index, close }
    }
}

/// Sampling granularity of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    FiveMin,
    #[serde(rename = "15m")]
    FifteenMin,
    #[serde(rename = "1h")]
    Hourly,
    #[default]
    #[serde(rename = "1d")]
    Daily,
}

impl Timeframe {
    /// Stable tag used in cache keys and on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FiveMin => "5m",
            Self::FifteenMin => "15m",
            Self::Hourly => "1h",
            Self::Daily => "1d",
        }
    }

    pub fn all() -> [Self; 4] {
        [Self::FiveMin, Self::FifteenMin, Self::Hourly, Self::Daily]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Timeframe {
    type Err = TradechartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|tf| tf.tag() == s)
            .ok_or_else(|| TradechartError::Configuration(format!("Unknown timeframe tag: {}", s)))
    }
}

/// Closed set of supported indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Sma,
    Ema,
    BollingerBands,
}

impl IndicatorKind {
    /// Persisted name, used in preset rows and cache keys.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::BollingerBands => "BOLLINGER_BANDS",
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Sma, Self::Ema, Self::BollingerBands]
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = TradechartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TradechartError::UnknownIndicator(s.to_string()))
    }
}

/// A single emitted value of a line indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: i64,
    pub value: f64,
}

/// The three band values sharing one x position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub x: i64,
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Computed output of an indicator.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorSeries {
    Line(Vec<SeriesPoint>),
    Bands(Vec<BandPoint>),
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        match self {
            Self::Line(points) => points.len(),
            Self::Bands(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits bands into (middle, upper, lower) line series.
    pub fn split_bands(points: &[BandPoint]) -> [Vec<SeriesPoint>; 3] {
        let line = |f: fn(&BandPoint) -> f64| {
            points
                .iter()
                .map(|p| SeriesPoint { x: p.x, value: f(p) })
                .collect::<Vec<_>>()
        };
        [line(|p| p.middle), line(|p| p.upper), line(|p| p.lower)]
    }
}
