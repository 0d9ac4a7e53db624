use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceRecord - One current-price observation (row of crypto_prices.csv)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Time")]
    pub time: NaiveTime,
    #[serde(rename = "Price (USD)")]
    pub price_usd: f64,
}

impl PriceRecord {
    /// Date and time of the observation combined.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

// ---------------------------------------------------------------------------
// PriceSample - Raw `[timestampMillis, price]` pair from the market chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub timestamp_ms: i64,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// DailyAverage - Mean price of all samples sharing a calendar date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// DailyAverageRecord - Row of daily_averages.csv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverageRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Price (USD)")]
    pub price_usd: f64,
}

impl DailyAverageRecord {
    /// Row for `name`'s average on one date.
    pub fn new(name: &str, average: &DailyAverage) -> Self {
        Self {
            name: name.to_string(),
            date: average.date,
            price_usd: average.price,
        }
    }
}

impl From<&DailyAverageRecord> for DailyAverage {
    fn from(record: &DailyAverageRecord) -> Self {
        Self {
            date: record.date,
            price: record.price_usd,
        }
    }
}
