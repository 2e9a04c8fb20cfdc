pub mod indicators;
pub mod params;
pub mod registry;
pub mod traits;

pub use params::{ExtraParams, IndicatorParams, IndicatorSpec};
pub use registry::FunctionRegistry;
pub use traits::IndicatorFunction;
