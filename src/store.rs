//! Append-only CSV tables for price history.
//!
//! Current-price observations and daily averages have different columns, so
//! each lives in its own file:
//!
//! - `crypto_prices.csv`: `Name,Symbol,Date,Time,Price (USD)`
//! - `daily_averages.csv`: `Name,Date,Price (USD)`
//!
//! The header is written only when a file is created. Reads scan the whole
//! file and filter by coin name.

use crate::config;
use crate::error::Result;
use crate::models::{DailyAverage, DailyAverageRecord, PriceRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::info;

// ---------------------------------------------------------------------------
// CsvTable
// ---------------------------------------------------------------------------

/// A CSV file holding rows of a single serde type.
pub struct CsvTable<T> {
    path: PathBuf,
    _row: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> CsvTable<T> {
    /// Table backed by the CSV file at `path`. Nothing is touched until the
    /// first append.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _row: PhantomData,
        }
    }

    /// Location of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append rows, writing the header first if the file does not exist yet.
    pub fn append(&self, rows: &[T]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let is_new = !self.path.exists();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!(path = %self.path.display(), rows = rows.len(), "appended rows");
        Ok(rows.len())
    }

    /// Every row in the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// PriceStore
// ---------------------------------------------------------------------------

pub struct PriceStore {
    prices: CsvTable<PriceRecord>,
    daily: CsvTable<DailyAverageRecord>,
}

impl PriceStore {
    /// Open both tables inside `dir` using the default file names.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(config::PRICES_FILE), dir.join(config::DAILY_FILE))
    }

    /// Open the two tables at explicit paths.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(prices_path: P, daily_path: Q) -> Self {
        Self {
            prices: CsvTable::new(prices_path),
            daily: CsvTable::new(daily_path),
        }
    }

    /// Location of the current-price history.
    pub fn prices_path(&self) -> &Path {
        self.prices.path()
    }

    /// Location of the daily-average table.
    pub fn daily_path(&self) -> &Path {
        self.daily.path()
    }

    pub fn append_prices(&self, records: &[PriceRecord]) -> Result<usize> {
        self.prices.append(records)
    }

    /// Current-price observations for one coin, in file order.
    pub fn history(&self, identifier: &str) -> Result<Vec<PriceRecord>> {
        Ok(self
            .prices
            .read_all()?
            .into_iter()
            .filter(|r| r.name == identifier)
            .collect())
    }

    pub fn append_daily(&self, identifier: &str, series: &[DailyAverage]) -> Result<usize> {
        let rows: Vec<DailyAverageRecord> = series
            .iter()
            .map(|avg| DailyAverageRecord::new(identifier, avg))
            .collect();
        self.daily.append(&rows)
    }

    /// Stored daily averages for one coin, in file order.
    pub fn daily_history(&self, identifier: &str) -> Result<Vec<DailyAverageRecord>> {
        Ok(self
            .daily
            .read_all()?
            .into_iter()
            .filter(|r| r.name == identifier)
            .collect())
    }
}
