use crate::chart::factory::IndicatorFactory;
use crate::chart::indicator::Indicator;
use crate::data::{IndicatorStore, PresetRow};
use crate::error::{Result, TradechartError};
use crate::functions::IndicatorSpec;
use crate::types::Timeframe;
use std::collections::HashMap;
use std::sync::Arc;

pub const PRESET_SLOTS: usize = 5;

/// Indicators of one slot keyed by local id ("0", "1", ...).
pub type PresetSlot = HashMap<String, Indicator>;

/// Up to [`PRESET_SLOTS`] indicator sets for one user and symbol.
pub struct PresetManager {
    store: Arc<dyn IndicatorStore>,
    factory: IndicatorFactory,
    user_id: String,
    symbol: String,
    slots: Vec<Option<PresetSlot>>,
}

impl PresetManager {
    pub fn new(
        store: Arc<dyn IndicatorStore>,
        factory: IndicatorFactory,
        user_id: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            store,
            factory,
            user_id: user_id.into(),
            symbol: symbol.into(),
            slots: empty_slots(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Reads all five slots from the store.
    ///
    /// Indicators are rebuilt on the daily timeframe with local ids in row
    /// order. Any bad row fails the whole load and the current slots stay.
    pub fn load(&mut self) -> Result<()> {
        let mut slots = empty_slots();

        for row in self.store.load_presets(&self.user_id, &self.symbol)? {
            let index = slot_index(row.slot).map_err(|e| {
                log::error!("Preset row {}/{} has a bad slot: {}", row.slot, row.row, e);
                e
            })?;
            let indicators = slots[index].get_or_insert_with(PresetSlot::new);
            let local_id = indicators.len().to_string();
            let indicator = self
                .factory
                .create_named(&row.kind, local_id.clone(), &self.symbol, Timeframe::Daily, &row.params)
                .map_err(|e| {
                    log::error!("Preset row {}/{} is malformed: {}", row.slot, row.row, e);
                    e
                })?;
            indicators.insert(local_id, indicator);
        }

        self.slots = slots;
        log::info!(
            "Loaded presets for user {} on {}: {} slot(s) in use",
            self.user_id,
            self.symbol,
            self.slots.iter().filter(|s| s.is_some()).count()
        );
        Ok(())
    }

    /// Replaces every persisted row for this user and symbol in one transaction.
    pub fn store(&self) -> Result<()> {
        let mut rows = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(indicators) = slot else { continue };
            for (row, indicator) in ordered(indicators).into_iter().enumerate() {
                rows.push(PresetRow {
                    user_id: self.user_id.clone(),
                    slot: index + 1,
                    row,
                    symbol: self.symbol.clone(),
                    kind: indicator.kind().name().to_string(),
                    params: indicator.serialize_params(),
                });
            }
        }

        self.store
            .replace_presets(&self.user_id, &self.symbol, &rows)
            .map_err(|e| {
                TradechartError::PresetPersist(format!(
                    "could not store presets for user {} on {}: {}",
                    self.user_id, self.symbol, e
                ))
            })
    }

    /// Indicators of slot `number` (1-based), `None` if the slot is unused.
    pub fn slot(&self, number: usize) -> Result<Option<&PresetSlot>> {
        let index = slot_index(number)?;
        Ok(self.slots[index].as_ref())
    }

    /// Replaces slot `number` with copies of `indicators`, in the given order.
    ///
    /// An empty iterator clears the slot. Nothing is persisted until `store`.
    pub fn capture<'a>(&mut self, number: usize, indicators: impl IntoIterator<Item = &'a Indicator>) -> Result<()> {
        let index = slot_index(number)?;

        let mut captured = PresetSlot::new();
        for (local_id, indicator) in indicators.into_iter().enumerate() {
            let spec = IndicatorSpec::new(indicator.kind(), &self.symbol, Timeframe::Daily, *indicator.params());
            captured.insert(local_id.to_string(), self.factory.from_spec(local_id.to_string(), spec)?);
        }

        self.slots[index] = if captured.is_empty() { None } else { Some(captured) };
        Ok(())
    }

    /// Clears slot `number` in memory.
    pub fn clear_slot(&mut self, number: usize) -> Result<()> {
        let index = slot_index(number)?;
        self.slots[index] = None;
        Ok(())
    }
}

fn empty_slots() -> Vec<Option<PresetSlot>> {
    (0..PRESET_SLOTS).map(|_| None).collect()
}

fn slot_index(number: usize) -> Result<usize> {
    if number == 0 || number > PRESET_SLOTS {
        return Err(TradechartError::IndexOutOfRange {
            index: number,
            max: PRESET_SLOTS,
        });
    }
    Ok(number - 1)
}

/// Slot contents ordered by numeric local id.
pub fn ordered(slot: &PresetSlot) -> Vec<&Indicator> {
    let mut entries: Vec<(&String, &Indicator)> = slot.iter().collect();
    entries.sort_by_key(|(local_id, _)| local_id.parse::<u64>().unwrap_or(u64::MAX));
    entries.into_iter().map(|(_, indicator)| indicator).collect()
}
