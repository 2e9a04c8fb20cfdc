use crate::chart::context::{CacheStatus, IndicatorContext};
use crate::chart::render::{ChartRenderer, SeriesStyle};
use crate::error::{Result, TradechartError};
use crate::functions::{IndicatorParams, IndicatorSpec};
use crate::types::{IndicatorKind, IndicatorSeries, SeriesPoint, Timeframe};
use std::fmt;
use std::sync::Arc;

const BAND_SUFFIXES: [&str; 3] = ["_middle", "_upper", "_lower"];

/// Result of a successful draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Rendered { points: usize, cache: CacheStatus },
    /// Not enough prices for one window; nothing is on the chart.
    NoData,
}

/// One indicator attached to a chart.
pub struct Indicator {
    id: String,
    spec: IndicatorSpec,
    visible: bool,
    overlay: bool,
    drawn: bool,
    context: Arc<IndicatorContext>,
}

impl Indicator {
    pub(crate) fn new(id: String, spec: IndicatorSpec, overlay: bool, context: Arc<IndicatorContext>) -> Self {
        Self {
            id,
            spec,
            visible: true,
            overlay,
            drawn: false,
            context,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spec(&self) -> &IndicatorSpec {
        &self.spec
    }

    pub fn kind(&self) -> IndicatorKind {
        self.spec.kind
    }

    pub fn timeframe(&self) -> Timeframe {
        self.spec.timeframe
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.spec.params
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_overlay(&self) -> bool {
        self.overlay
    }

    /// Whether series of this indicator are currently on the chart.
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.spec.timeframe = timeframe;
    }

    pub fn serialize_params(&self) -> String {
        self.spec.serialize_params()
    }

    pub fn param_vector(&self) -> Vec<f64> {
        self.spec.params.to_vector()
    }

    /// Chart series ids owned by this indicator.
    pub fn series_ids(&self) -> Vec<String> {
        match self.spec.kind {
            IndicatorKind::Sma | IndicatorKind::Ema => vec![self.id.clone()],
            IndicatorKind::BollingerBands => BAND_SUFFIXES
                .iter()
                .map(|suffix| format!("{}{}", self.id, suffix))
                .collect(),
        }
    }

    pub fn style(&self) -> SeriesStyle {
        SeriesStyle {
            color: self.spec.params.color,
            line_width: self.spec.params.line_width,
        }
    }

    /// Cached series for the current spec, computing it on a miss.
    pub fn compute(&self) -> Result<(IndicatorSeries, CacheStatus)> {
        self.context.series_for(&self.spec)
    }

    /// Removes any previous rendering, then renders the current series.
    ///
    /// On failure the indicator is left off the chart and marked invisible.
    pub fn draw_onto(&mut self, chart: &mut dyn ChartRenderer) -> Result<DrawOutcome> {
        self.remove_from(chart);

        let (series, cache) = match self.compute() {
            Ok(result) => result,
            Err(e) => {
                self.visible = false;
                log::warn!("Indicator {} could not load data: {}", self.id, e);
                return Err(e);
            }
        };

        if series.is_empty() {
            self.visible = true;
            return Ok(DrawOutcome::NoData);
        }

        let points = series.len();
        let layers: Vec<(String, Vec<SeriesPoint>)> = match series {
            IndicatorSeries::Line(line) => vec![(self.id.clone(), line)],
            IndicatorSeries::Bands(bands) => self
                .series_ids()
                .into_iter()
                .zip(IndicatorSeries::split_bands(&bands))
                .collect(),
        };

        let style = self.style();
        let mut added: Vec<&str> = Vec::with_capacity(layers.len());
        for (series_id, line) in &layers {
            if let Err(e) = chart.add_series(series_id, line, style) {
                for id in &added {
                    chart.remove_series_by_id(id);
                }
                self.visible = false;
                log::warn!("Chart rejected indicator {}: {}", self.id, e);
                return Err(match e {
                    TradechartError::Render { .. } => e,
                    other => TradechartError::Render {
                        series_id: series_id.clone(),
                        reason: other.to_string(),
                    },
                });
            }
            added.push(series_id);
        }

        self.drawn = true;
        self.visible = true;
        Ok(DrawOutcome::Rendered { points, cache })
    }

    /// No-op if nothing is drawn.
    pub fn remove_from(&mut self, chart: &mut dyn ChartRenderer) {
        if !self.drawn {
            return;
        }
        for series_id in self.series_ids() {
            chart.remove_series_by_id(&series_id);
        }
        self.drawn = false;
    }

    /// Replaces the numeric parameters and redraws. The id does not change.
    pub fn apply_settings(&mut self, params: IndicatorParams, chart: &mut dyn ChartRenderer) -> Result<DrawOutcome> {
        if params.to_vector().len() != IndicatorParams::arity(self.spec.kind) {
            return Err(TradechartError::InvalidParams(format!(
                "parameter layout does not match {}",
                self.spec.kind
            )));
        }
        self.remove_from(chart);
        self.spec.params = params;
        self.draw_onto(chart)
    }
}

impl fmt::Debug for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indicator")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .field("visible", &self.visible)
            .field("overlay", &self.overlay)
            .field("drawn", &self.drawn)
            .finish()
    }
}
