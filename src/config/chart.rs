use super::traits::ConfigSection;
use crate::error::TradechartError;
use crate::types::{IndicatorKind, Timeframe};
use serde::{Deserialize, Serialize};

/// Defaults applied when a chart session starts or an indicator is added
/// without explicit parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub default_timeframe: Timeframe,
    pub default_color: i32,
    pub default_period: usize,
    pub default_line_width: f64,
    pub default_std_dev_multiplier: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_timeframe: Timeframe::Daily,
            default_color: -16776961, // opaque blue
            default_period: 20,
            default_line_width: 1.5,
            default_std_dev_multiplier: 2.0,
        }
    }
}

impl ChartConfig {
    /// Parameter vector in wire order for `kind`.
    pub fn default_params(&self, kind: IndicatorKind) -> Vec<f64> {
        let color = self.default_color as f64;
        let period = self.default_period as f64;
        match kind {
            IndicatorKind::Sma | IndicatorKind::Ema => vec![color, period, self.default_line_width],
            IndicatorKind::BollingerBands => vec![
                color,
                period,
                self.default_std_dev_multiplier,
                self.default_line_width,
            ],
        }
    }
}

impl ConfigSection for ChartConfig {
    fn validate(&self) -> Result<(), TradechartError> {
        if self.default_period < 1 {
            return Err(TradechartError::Configuration(
                "Default period must be at least 1".to_string(),
            ));
        }
        if !self.default_line_width.is_finite() || self.default_line_width < 0.0 {
            return Err(TradechartError::Configuration(
                "Default line width must be a non-negative number".to_string(),
            ));
        }
        if !self.default_std_dev_multiplier.is_finite() || self.default_std_dev_multiplier < 0.0 {
            return Err(TradechartError::Configuration(
                "Default std-dev multiplier must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
