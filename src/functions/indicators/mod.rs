mod frame;
pub mod trend;
pub mod volatility;

pub use trend::{exponential_moving_average, simple_moving_average, EMA, SMA};
pub use volatility::{bollinger_bands, BollingerBands};
