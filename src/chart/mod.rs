pub mod context;
pub mod factory;
pub mod indicator;
pub mod manager;
pub mod presets;
pub mod render;

pub use context::{CacheStatus, IndicatorContext};
pub use factory::IndicatorFactory;
pub use indicator::{DrawOutcome, Indicator};
pub use manager::{IndicatorManager, IndicatorWarning};
pub use presets::{PresetManager, PresetSlot, PRESET_SLOTS};
pub use render::{ChartRenderer, MemoryChart, RenderedSeries, SeriesStyle};
