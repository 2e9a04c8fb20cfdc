pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod functions;
pub mod types;
pub mod utils;

pub use error::{Result, TradechartError};
