use crate::error::{Result, TradechartError};
use polars::prelude::*;
use std::path::Path;
use super::{types::PriceColumn, validator::DataValidator};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| TradechartError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        log::info!("Loaded {} rows from {}", df.height(), path.as_ref().display());
        Ok(df)
    }

    /// Load a price CSV and rename its columns to the standard lowercase names
    pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = Self::load(path)?;
        Self::normalize_columns(df)
    }

    /// Normalize column names to lowercase standard names
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        let column_map = DataValidator::validate_price_frame(&df)?;

        for (required, actual_name) in column_map {
            let standard_name = required.as_str();
            if actual_name != standard_name {
                df.rename(&actual_name, standard_name.into())
                    .map_err(|e| TradechartError::DataLoading(format!("Failed to rename column: {}", e)))?;
            }
        }

        let nulls = df.column(PriceColumn::Close.as_str())?.null_count();
        if nulls > 0 {
            log::warn!("{} null close values will be skipped", nulls);
        }

        Ok(df)
    }
}
