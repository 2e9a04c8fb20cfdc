//! DuckDB storage for cached series and preset rows.

use super::{IndicatorStore, PresetRow, StoredSeries};
use crate::data::cache::CacheKey;
use crate::error::{Result, TradechartError};
use crate::types::{BandPoint, IndicatorKind, IndicatorSeries, SeriesPoint};
use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// DuckDB-backed [`IndicatorStore`].
///
/// Values are `DOUBLE` columns so a cache hit returns the exact bits that
/// were computed.
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Create or open a database file at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        log::info!("Opened indicator store at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS indicator_entries (
            symbol TEXT NOT NULL,
            indicator TEXT NOT NULL,
            period BIGINT NOT NULL,
            timeframe TEXT NOT NULL,
            multiplier DOUBLE NOT NULL,
            points BIGINT NOT NULL,
            computed_at BIGINT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_key
            ON indicator_entries(symbol, indicator, period, timeframe);

        CREATE TABLE IF NOT EXISTS line_values (
            symbol TEXT NOT NULL,
            idx BIGINT NOT NULL,
            value DOUBLE NOT NULL,
            period BIGINT NOT NULL,
            timeframe TEXT NOT NULL,
            indicator TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_line_values_key
            ON line_values(symbol, indicator, period, timeframe);

        CREATE TABLE IF NOT EXISTS band_values (
            symbol TEXT NOT NULL,
            idx BIGINT NOT NULL,
            middle_band DOUBLE NOT NULL,
            upper_band DOUBLE NOT NULL,
            lower_band DOUBLE NOT NULL,
            period BIGINT NOT NULL,
            timeframe TEXT NOT NULL,
            multiplier DOUBLE NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_band_values_key
            ON band_values(symbol, period, timeframe);

        CREATE TABLE IF NOT EXISTS presets (
            user_id TEXT NOT NULL,
            slot BIGINT NOT NULL,
            row_no BIGINT NOT NULL,
            symbol TEXT NOT NULL,
            kind TEXT NOT NULL,
            params TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_presets_owner
            ON presets(user_id, symbol);
        "#,
    )?;
    Ok(())
}

/// Line entries have no multiplier; they are stored with 0.
fn entry_multiplier(key: &CacheKey) -> f64 {
    key.multiplier.unwrap_or(0.0)
}

fn delete_entry(conn: &Connection, key: &CacheKey) -> Result<()> {
    let (symbol, indicator, period, timeframe) = (
        key.symbol.as_str(),
        key.kind.name(),
        key.period as i64,
        key.timeframe.tag(),
    );
    conn.execute(
        "DELETE FROM indicator_entries WHERE symbol = ? AND indicator = ? AND period = ? AND timeframe = ? AND multiplier = ?",
        params![symbol, indicator, period, timeframe, entry_multiplier(key)],
    )?;
    match key.kind {
        IndicatorKind::Sma | IndicatorKind::Ema => {
            conn.execute(
                "DELETE FROM line_values WHERE symbol = ? AND indicator = ? AND period = ? AND timeframe = ?",
                params![symbol, indicator, period, timeframe],
            )?;
        }
        IndicatorKind::BollingerBands => {
            conn.execute(
                "DELETE FROM band_values WHERE symbol = ? AND period = ? AND timeframe = ? AND multiplier = ?",
                params![symbol, period, timeframe, entry_multiplier(key)],
            )?;
        }
    }
    Ok(())
}

impl IndicatorStore for DuckDbStore {
    fn load_series(&self, key: &CacheKey) -> Result<Option<StoredSeries>> {
        let conn = self.lock();
        let (symbol, indicator, period, timeframe) = (
            key.symbol.as_str(),
            key.kind.name(),
            key.period as i64,
            key.timeframe.tag(),
        );

        let (points, millis): (i64, i64) = {
            let mut stmt = conn.prepare(
                "SELECT points, computed_at FROM indicator_entries
                 WHERE symbol = ? AND indicator = ? AND period = ? AND timeframe = ? AND multiplier = ?",
            )?;
            let mut rows = stmt.query(params![symbol, indicator, period, timeframe, entry_multiplier(key)])?;
            match rows.next()? {
                Some(row) => (row.get(0)?, row.get(1)?),
                None => return Ok(None),
            }
        };
        let computed_at = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            TradechartError::Storage(format!("bad computed_at {} for {}", millis, key.storage_id()))
        })?;

        let series = match key.kind {
            IndicatorKind::Sma | IndicatorKind::Ema => {
                let mut stmt = conn.prepare(
                    "SELECT idx, value FROM line_values
                     WHERE symbol = ? AND indicator = ? AND period = ? AND timeframe = ?
                     ORDER BY idx",
                )?;
                let values = stmt
                    .query_map(params![symbol, indicator, period, timeframe], |row| {
                        Ok(SeriesPoint {
                            x: row.get(0)?,
                            value: row.get(1)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                IndicatorSeries::Line(values)
            }
            IndicatorKind::BollingerBands => {
                let mut stmt = conn.prepare(
                    "SELECT idx, middle_band, upper_band, lower_band FROM band_values
                     WHERE symbol = ? AND period = ? AND timeframe = ? AND multiplier = ?
                     ORDER BY idx",
                )?;
                let values = stmt
                    .query_map(params![symbol, period, timeframe, entry_multiplier(key)], |row| {
                        Ok(BandPoint {
                            x: row.get(0)?,
                            middle: row.get(1)?,
                            upper: row.get(2)?,
                            lower: row.get(3)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                IndicatorSeries::Bands(values)
            }
        };

        Ok(Some(StoredSeries {
            points: points.max(0) as usize,
            computed_at,
            series,
        }))
    }

    fn save_series(&self, key: &CacheKey, series: &IndicatorSeries, computed_at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        delete_entry(&tx, key)?;

        let (symbol, indicator, period, timeframe) = (
            key.symbol.as_str(),
            key.kind.name(),
            key.period as i64,
            key.timeframe.tag(),
        );
        match series {
            IndicatorSeries::Line(points) => {
                let mut stmt = tx.prepare(
                    "INSERT INTO line_values (symbol, idx, value, period, timeframe, indicator)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )?;
                for p in points {
                    stmt.execute(params![symbol, p.x, p.value, period, timeframe, indicator])?;
                }
            }
            IndicatorSeries::Bands(points) => {
                let mut stmt = tx.prepare(
                    "INSERT INTO band_values (symbol, idx, middle_band, upper_band, lower_band, period, timeframe, multiplier)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )?;
                for p in points {
                    stmt.execute(params![
                        symbol,
                        p.x,
                        p.middle,
                        p.upper,
                        p.lower,
                        period,
                        timeframe,
                        entry_multiplier(key)
                    ])?;
                }
            }
        }

        tx.execute(
            "INSERT INTO indicator_entries (symbol, indicator, period, timeframe, multiplier, points, computed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                symbol,
                indicator,
                period,
                timeframe,
                entry_multiplier(key),
                series.len() as i64,
                computed_at.timestamp_millis()
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_symbol_series(&self, symbol: &str) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for table in ["indicator_entries", "line_values", "band_values"] {
            tx.execute(&format!("DELETE FROM {} WHERE symbol = ?", table), params![symbol])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load_presets(&self, user_id: &str, symbol: &str) -> Result<Vec<PresetRow>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT user_id, slot, row_no, symbol, kind, params FROM presets
             WHERE user_id = ? AND symbol = ?
             ORDER BY slot, row_no",
        )?;
        let rows = stmt
            .query_map(params![user_id, symbol], |row| {
                Ok(PresetRow {
                    user_id: row.get(0)?,
                    slot: row.get::<_, i64>(1)?.max(0) as usize,
                    row: row.get::<_, i64>(2)?.max(0) as usize,
                    symbol: row.get(3)?,
                    kind: row.get(4)?,
                    params: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn replace_presets(&self, user_id: &str, symbol: &str, rows: &[PresetRow]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM presets WHERE user_id = ? AND symbol = ?",
            params![user_id, symbol],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO presets (user_id, slot, row_no, symbol, kind, params) VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for row in rows {
                stmt.execute(params![
                    user_id,
                    row.slot as i64,
                    row.row as i64,
                    symbol,
                    row.kind.as_str(),
                    row.params.as_str()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timeframe;
    use tempfile::tempdir;

    fn line_key(kind: IndicatorKind) -> CacheKey {
        CacheKey::new("AAPL", kind, 3, Timeframe::Hourly, None)
    }

    fn band_key(multiplier: f64) -> CacheKey {
        CacheKey::new("AAPL", IndicatorKind::BollingerBands, 3, Timeframe::Hourly, Some(multiplier))
    }

    #[test]
    fn test_line_values_keep_exact_bits() {
        let store = DuckDbStore::open_in_memory().unwrap();
        let values = [0.1 + 0.2, 1.0 / 3.0, 101.23456789012345, f64::MIN_POSITIVE];
        let series = IndicatorSeries::Line(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| SeriesPoint { x: i as i64 * 5, value })
                .collect(),
        );
        store.save_series(&line_key(IndicatorKind::Ema), &series, Utc::now()).unwrap();

        let stored = store.load_series(&line_key(IndicatorKind::Ema)).unwrap().unwrap();
        assert_eq!(stored.points, 4);
        let IndicatorSeries::Line(points) = stored.series else {
            panic!("expected a line series");
        };
        for (point, expected) in points.iter().zip(values) {
            assert_eq!(point.value.to_bits(), expected.to_bits());
        }
        assert!(store.load_series(&line_key(IndicatorKind::Sma)).unwrap().is_none());
    }

    #[test]
    fn test_bands_are_keyed_by_multiplier() {
        let store = DuckDbStore::open_in_memory().unwrap();
        let narrow = IndicatorSeries::Bands(vec![BandPoint {
            x: 2,
            middle: 10.0,
            upper: 11.0,
            lower: 9.0,
        }]);
        store.save_series(&band_key(1.0), &narrow, Utc::now()).unwrap();

        assert!(store.load_series(&band_key(2.0)).unwrap().is_none());
        assert_eq!(store.load_series(&band_key(1.0)).unwrap().unwrap().series, narrow);
    }

    #[test]
    fn test_save_replaces_previous_rows() {
        let store = DuckDbStore::open_in_memory().unwrap();
        let key = line_key(IndicatorKind::Sma);
        let first = IndicatorSeries::Line(vec![SeriesPoint { x: 1, value: 1.0 }, SeriesPoint { x: 2, value: 2.0 }]);
        let second = IndicatorSeries::Line(vec![SeriesPoint { x: 2, value: 4.0 }]);
        store.save_series(&key, &first, Utc::now()).unwrap();
        store.save_series(&key, &second, Utc::now()).unwrap();

        let stored = store.load_series(&key).unwrap().unwrap();
        assert_eq!(stored.points, 1);
        assert_eq!(stored.series, second);
    }

    #[test]
    fn test_presets_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store").join("tradechart.duckdb");
        let rows = vec![
            PresetRow {
                user_id: "alice".to_string(),
                slot: 2,
                row: 1,
                symbol: "AAPL".to_string(),
                kind: "EMA".to_string(),
                params: "1:9:1.0".to_string(),
            },
            PresetRow {
                user_id: "alice".to_string(),
                slot: 2,
                row: 0,
                symbol: "AAPL".to_string(),
                kind: "SMA".to_string(),
                params: "1:5:1.0".to_string(),
            },
        ];

        {
            let store = DuckDbStore::open(&path).unwrap();
            store.replace_presets("alice", "AAPL", &rows).unwrap();
            store.replace_presets("bob", "AAPL", &rows[..1]).unwrap();
        }

        let store = DuckDbStore::open(&path).unwrap();
        let loaded = store.load_presets("alice", "AAPL").unwrap();
        assert_eq!(loaded, vec![rows[1].clone(), rows[0].clone()]);
        assert!(store.load_presets("alice", "MSFT").unwrap().is_empty());

        store.replace_presets("alice", "AAPL", &[]).unwrap();
        assert!(store.load_presets("alice", "AAPL").unwrap().is_empty());
        assert_eq!(store.load_presets("bob", "AAPL").unwrap().len(), 1);
    }
}
