use crate::{
    data::cache::CacheKey,
    error::{Result, TradechartError},
    types::{IndicatorKind, Timeframe},
};

/// Kind-specific numeric parameters beyond the shared color/period/width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtraParams {
    None,
    Bollinger { std_dev_multiplier: f64 },
}

/// Numeric parameter set of one indicator.
///
/// Wire order is `[color, period, width]` for moving averages and
/// `[color, period, stdDevMultiplier, width]` for Bollinger Bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub color: i32,
    pub period: usize,
    pub line_width: f64,
    pub extra: ExtraParams,
}

impl IndicatorParams {
    pub fn moving_average(color: i32, period: usize, line_width: f64) -> Self {
        Self {
            color,
            period,
            line_width,
            extra: ExtraParams::None,
        }
    }

    pub fn bollinger(color: i32, period: usize, std_dev_multiplier: f64, line_width: f64) -> Self {
        Self {
            color,
            period,
            line_width,
            extra: ExtraParams::Bollinger { std_dev_multiplier },
        }
    }

    /// Number of fields in the wire vector for `kind`.
    pub fn arity(kind: IndicatorKind) -> usize {
        match kind {
            IndicatorKind::Sma | IndicatorKind::Ema => 3,
            IndicatorKind::BollingerBands => 4,
        }
    }

    pub fn from_vector(kind: IndicatorKind, values: &[f64]) -> Result<Self> {
        let arity = Self::arity(kind);
        if values.len() != arity {
            return Err(TradechartError::InvalidParams(format!(
                "{} expects {} parameters, got {}",
                kind,
                arity,
                values.len()
            )));
        }

        let color = parse_color(values[0])?;
        let period = parse_period(values[1])?;
        match kind {
            IndicatorKind::Sma | IndicatorKind::Ema => {
                let line_width = parse_non_negative("width", values[2])?;
                Ok(Self::moving_average(color, period, line_width))
            }
            IndicatorKind::BollingerBands => {
                let multiplier = parse_non_negative("stdDevMultiplier", values[2])?;
                let line_width = parse_non_negative("width", values[3])?;
                Ok(Self::bollinger(color, period, multiplier, line_width))
            }
        }
    }

    pub fn to_vector(&self) -> Vec<f64> {
        let mut values = vec![self.color as f64, self.period as f64];
        if let ExtraParams::Bollinger { std_dev_multiplier } = self.extra {
            values.push(std_dev_multiplier);
        }
        values.push(self.line_width);
        values
    }

    /// Colon-delimited persisted form, e.g. `-16776961:20:2.0:1.5`.
    pub fn serialize(&self) -> String {
        let mut fields = vec![self.color.to_string(), self.period.to_string()];
        if let ExtraParams::Bollinger { std_dev_multiplier } = self.extra {
            fields.push(format_real(std_dev_multiplier));
        }
        fields.push(format_real(self.line_width));
        fields.join(":")
    }

    pub fn parse(kind: IndicatorKind, serialized: &str) -> Result<Self> {
        let values = serialized
            .split(':')
            .map(|field| {
                field.trim().parse::<f64>().map_err(|e| {
                    TradechartError::InvalidParams(format!("bad field '{}' in '{}': {}", field, serialized, e))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::from_vector(kind, &values)
    }

    pub fn std_dev_multiplier(&self) -> Option<f64> {
        match self.extra {
            ExtraParams::Bollinger { std_dev_multiplier } => Some(std_dev_multiplier),
            ExtraParams::None => None,
        }
    }
}

fn parse_color(value: f64) -> Result<i32> {
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(TradechartError::InvalidParams(format!(
            "color must be a 32-bit integer, got {}",
            value
        )));
    }
    Ok(value as i32)
}

fn parse_period(value: f64) -> Result<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 {
        return Err(TradechartError::InvalidParams(format!(
            "period must be an integer >= 1, got {}",
            value
        )));
    }
    Ok(value as usize)
}

fn parse_non_negative(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(TradechartError::InvalidParams(format!(
            "{} must be finite and >= 0, got {}",
            name, value
        )));
    }
    Ok(value)
}

// Debug formatting is the shortest round-trip form and always keeps a
// decimal point for whole numbers ("2.0").
fn format_real(value: f64) -> String {
    format!("{:?}", value)
}

/// Canonical parameter tuple of one indicator instance.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub params: IndicatorParams,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, symbol: impl Into<String>, timeframe: Timeframe, params: IndicatorParams) -> Self {
        Self {
            kind,
            symbol: symbol.into(),
            timeframe,
            params,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            &self.symbol,
            self.kind,
            self.params.period,
            self.timeframe,
            self.params.std_dev_multiplier(),
        )
    }

    pub fn serialize_params(&self) -> String {
        self.params.serialize()
    }
}
