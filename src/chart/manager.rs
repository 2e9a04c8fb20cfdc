use crate::chart::context::IndicatorContext;
use crate::chart::factory::IndicatorFactory;
use crate::chart::indicator::Indicator;
use crate::chart::presets::{self, PresetSlot};
use crate::chart::render::ChartRenderer;
use crate::error::{Result, TradechartError};
use crate::functions::IndicatorParams;
use crate::types::{IndicatorKind, Timeframe};
use std::collections::HashMap;
use std::sync::Arc;

/// A failure that was absorbed and should be surfaced to the user.
#[derive(Debug)]
pub struct IndicatorWarning {
    pub id: String,
    pub error: TradechartError,
}

/// Owns the active indicators of one chart and symbol.
///
/// Every id in the map has (possibly invisible) presence on the chart;
/// `create` and `delete` are the only ways in and out.
pub struct IndicatorManager<C: ChartRenderer> {
    chart: C,
    factory: IndicatorFactory,
    symbol: String,
    timeframe: Timeframe,
    indicators: HashMap<String, Indicator>,
    next_id: u64,
    warnings: Vec<IndicatorWarning>,
}

impl<C: ChartRenderer> IndicatorManager<C> {
    pub fn new(chart: C, context: Arc<IndicatorContext>, symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            chart,
            factory: IndicatorFactory::new(context),
            symbol: symbol.into(),
            timeframe,
            indicators: HashMap::new(),
            next_id: 0,
            warnings: Vec::new(),
        }
    }

    /// Registers and draws a new indicator, returning its id.
    ///
    /// A malformed parameter vector is an error and registers nothing: it
    /// is treated as a caller bug, so no placeholder indicator is kept. A
    /// data or render failure still registers the indicator, invisible,
    /// with a warning queued.
    pub fn create(&mut self, kind: IndicatorKind, params: &[f64]) -> Result<String> {
        let id = self.next_id.to_string();
        self.next_id += 1;

        let mut indicator = self
            .factory
            .create(kind, id.clone(), &self.symbol, self.timeframe, params)?;

        match indicator.draw_onto(&mut self.chart) {
            Ok(outcome) => log::info!("Created {} {} ({:?})", kind, id, outcome),
            Err(error) => {
                log::warn!("Created {} {} but could not draw it: {}", kind, id, error);
                self.warnings.push(IndicatorWarning { id: id.clone(), error });
            }
        }

        self.indicators.insert(id.clone(), indicator);
        self.chart.invalidate();
        Ok(id)
    }

    /// Returns false (and logs) if `id` is not registered.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(mut indicator) = self.indicators.remove(id) else {
            log::warn!("Delete ignored: {}", TradechartError::NotFound(id.to_string()));
            return false;
        };
        indicator.remove_from(&mut self.chart);
        self.chart.invalidate();
        log::info!("Deleted indicator {}", id);
        true
    }

    /// Returns `Ok(false)` (and logs) if `id` is not registered.
    pub fn change_settings(&mut self, id: &str, params: &[f64]) -> Result<bool> {
        let Some(indicator) = self.indicators.get_mut(id) else {
            log::warn!("Settings change ignored: {}", TradechartError::NotFound(id.to_string()));
            return Ok(false);
        };

        let params = IndicatorParams::from_vector(indicator.kind(), params)?;
        if let Err(error) = indicator.apply_settings(params, &mut self.chart) {
            log::warn!("Indicator {} could not be redrawn with new settings: {}", id, error);
            self.warnings.push(IndicatorWarning {
                id: id.to_string(),
                error,
            });
        }
        self.chart.invalidate();
        Ok(true)
    }

    /// Moves every indicator to `timeframe` and redraws each once, then
    /// invalidates the chart once.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
        if self.indicators.is_empty() {
            return;
        }

        for (id, indicator) in self.indicators.iter_mut() {
            indicator.set_timeframe(timeframe);
            if let Err(error) = indicator.draw_onto(&mut self.chart) {
                log::warn!("Indicator {} failed to redraw for {}: {}", id, timeframe, error);
                self.warnings.push(IndicatorWarning { id: id.clone(), error });
            }
        }
        self.chart.invalidate();
    }

    /// Read view of every active indicator by id.
    pub fn all(&self) -> &HashMap<String, Indicator> {
        &self.indicators
    }

    pub fn get(&self, id: &str) -> Option<&Indicator> {
        self.indicators.get(id)
    }

    /// Re-creates the indicators of a preset slot under this manager's
    /// symbol and timeframe, in local-id order.
    pub fn apply_preset(&mut self, preset: &PresetSlot) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(preset.len());
        for indicator in presets::ordered(preset) {
            ids.push(self.create(indicator.kind(), &indicator.param_vector())?);
        }
        Ok(ids)
    }

    /// Deletes every active indicator.
    pub fn clear(&mut self) {
        let ids: Vec<String> = self.indicators.keys().cloned().collect();
        for id in ids {
            self.delete(&id);
        }
    }

    /// Drains warnings queued by absorbed failures.
    pub fn take_warnings(&mut self) -> Vec<IndicatorWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut C {
        &mut self.chart
    }

    pub fn factory(&self) -> &IndicatorFactory {
        &self.factory
    }
}
