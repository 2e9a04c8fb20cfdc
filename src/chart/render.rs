use crate::error::{Result, TradechartError};
use crate::types::SeriesPoint;
use std::collections::HashMap;

/// Opaque styling passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: i32,
    pub line_width: f64,
}

/// The chart widget as seen by the engine.
///
/// Calls are never made concurrently for one chart; the manager drives them
/// from a single thread of control.
pub trait ChartRenderer {
    fn add_series(&mut self, id: &str, points: &[SeriesPoint], style: SeriesStyle) -> Result<()>;

    /// Returns whether a series with this id was present.
    fn remove_series_by_id(&mut self, id: &str) -> bool;

    fn invalidate(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSeries {
    pub points: Vec<SeriesPoint>,
    pub style: SeriesStyle,
}

/// Headless renderer that keeps every series in memory.
#[derive(Debug, Default)]
pub struct MemoryChart {
    series: HashMap<String, RenderedSeries>,
    invalidations: usize,
}

impl MemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, id: &str) -> Option<&RenderedSeries> {
        self.series.get(id)
    }

    pub fn series_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.series.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations
    }
}

impl ChartRenderer for MemoryChart {
    fn add_series(&mut self, id: &str, points: &[SeriesPoint], style: SeriesStyle) -> Result<()> {
        if self.series.contains_key(id) {
            return Err(TradechartError::Render {
                series_id: id.to_string(),
                reason: "series already on chart".to_string(),
            });
        }
        self.series.insert(
            id.to_string(),
            RenderedSeries {
                points: points.to_vec(),
                style,
            },
        );
        Ok(())
    }

    fn remove_series_by_id(&mut self, id: &str) -> bool {
        self.series.remove(id).is_some()
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}
