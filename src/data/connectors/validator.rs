use crate::error::{Result, TradechartError};
use crate::types::PricePoint;
use polars::prelude::*;
use super::types::PriceColumn;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Resolve every required price column, returning the actual header used for each.
    pub fn validate_price_frame(df: &DataFrame) -> Result<HashMap<PriceColumn, String>> {
        let mut column_map = HashMap::new();

        for required in PriceColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(TradechartError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        if let Some(close_name) = column_map.get(&PriceColumn::Close) {
            let series = df.column(close_name)?;
            if !matches!(series.dtype(), DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
                return Err(TradechartError::DataLoading(format!(
                    "Column '{}' (close) must be numeric, found {:?}",
                    close_name,
                    series.dtype()
                )));
            }
        }

        Ok(column_map)
    }

    /// Find column by checking aliases
    fn find_column<'a>(df: &'a DataFrame, required: &PriceColumn) -> Option<&'a str> {
        let columns = df.get_column_names();
        for alias in required.aliases() {
            if columns.iter().any(|col| col.as_str() == alias) {
                return Some(alias);
            }
        }
        None
    }

    /// Sequence indices must be strictly increasing.
    pub fn validate_ordering(points: &[PricePoint]) -> Result<()> {
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].index <= pair[0].index {
                return Err(TradechartError::DataLoading(format!(
                    "Price series out of order at position {}: index {} follows {}",
                    i + 1,
                    pair[1].index,
                    pair[0].index
                )));
            }
        }
        Ok(())
    }
}
