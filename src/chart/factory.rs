use crate::chart::context::IndicatorContext;
use crate::chart::indicator::Indicator;
use crate::error::Result;
use crate::functions::{IndicatorParams, IndicatorSpec};
use crate::types::{IndicatorKind, Timeframe};
use std::sync::Arc;

/// Builds indicators from a kind plus a wire-order parameter vector
/// (`[color, period, ...]`).
#[derive(Clone)]
pub struct IndicatorFactory {
    context: Arc<IndicatorContext>,
}

impl IndicatorFactory {
    pub fn new(context: Arc<IndicatorContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<IndicatorContext> {
        &self.context
    }

    pub fn create(
        &self,
        kind: IndicatorKind,
        id: impl Into<String>,
        symbol: &str,
        timeframe: Timeframe,
        params: &[f64],
    ) -> Result<Indicator> {
        let params = IndicatorParams::from_vector(kind, params)?;
        self.from_spec(id, IndicatorSpec::new(kind, symbol, timeframe, params))
    }

    /// Builds from persisted text: a kind name and colon-delimited params.
    pub fn create_named(
        &self,
        kind_name: &str,
        id: impl Into<String>,
        symbol: &str,
        timeframe: Timeframe,
        serialized_params: &str,
    ) -> Result<Indicator> {
        let kind: IndicatorKind = kind_name.parse()?;
        let params = IndicatorParams::parse(kind, serialized_params)?;
        self.from_spec(id, IndicatorSpec::new(kind, symbol, timeframe, params))
    }

    pub fn from_spec(&self, id: impl Into<String>, spec: IndicatorSpec) -> Result<Indicator> {
        let function = self.context.registry().get(spec.kind)?;
        Ok(Indicator::new(id.into(), spec, function.is_overlay(), self.context.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryPriceSource, MemoryStore};
    use crate::error::TradechartError;

    fn factory() -> IndicatorFactory {
        let context = IndicatorContext::new(Arc::new(MemoryStore::new()), Arc::new(MemoryPriceSource::new()));
        IndicatorFactory::new(Arc::new(context))
    }

    #[test]
    fn test_create_from_vector() {
        let indicator = factory()
            .create(IndicatorKind::BollingerBands, "3", "AAPL", Timeframe::Hourly, &[5.0, 20.0, 2.0, 1.0])
            .unwrap();
        assert_eq!(indicator.id(), "3");
        assert_eq!(indicator.timeframe(), Timeframe::Hourly);
        assert!(indicator.is_overlay());
        assert!(indicator.is_visible());
        assert_eq!(indicator.serialize_params(), "5:20:2.0:1.0");
    }

    #[test]
    fn test_create_named_rejects_unknown_kind() {
        let result = factory().create_named("MACD", "0", "AAPL", Timeframe::Daily, "1:12:1.0");
        assert!(matches!(result, Err(TradechartError::UnknownIndicator(_))));
    }

    #[test]
    fn test_create_named_parses_params() {
        let indicator = factory()
            .create_named("EMA", "0", "AAPL", Timeframe::Daily, "-1:12:2.5")
            .unwrap();
        assert_eq!(indicator.kind(), IndicatorKind::Ema);
        assert_eq!(indicator.param_vector(), vec![-1.0, 12.0, 2.5]);
    }
}
