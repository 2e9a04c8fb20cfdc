use crate::error::{Result, TradechartError};
use crate::functions::{
    indicators::{BollingerBands, EMA, SMA},
    traits::IndicatorFunction,
};
use crate::types::IndicatorKind;
use std::{collections::HashMap, sync::Arc};

/// Kind-dispatch table for indicator computations.
pub struct FunctionRegistry {
    functions: HashMap<IndicatorKind, Arc<dyn IndicatorFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        registry.register_indicators();
        registry
    }

    pub fn get(&self, kind: IndicatorKind) -> Result<Arc<dyn IndicatorFunction>> {
        self.functions
            .get(&kind)
            .cloned()
            .ok_or_else(|| TradechartError::UnknownIndicator(kind.name().to_string()))
    }

    pub fn kinds(&self) -> Vec<IndicatorKind> {
        let mut kinds: Vec<IndicatorKind> = self.functions.keys().copied().collect();
        kinds.sort_by_key(|k| k.name());
        kinds
    }

    fn register_indicators(&mut self) {
        let indicators: Vec<Arc<dyn IndicatorFunction>> = vec![
            Arc::new(SMA),
            Arc::new(EMA),
            Arc::new(BollingerBands),
        ];

        for indicator in indicators {
            self.functions.insert(indicator.kind(), indicator);
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
