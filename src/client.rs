//! CoinGecko price client.
//!
//! Wraps the two remote calls the tracker needs: the coin lookup (which also
//! carries the current price) and the historical market chart. Only the
//! market chart is retried, with a fixed backoff taken from [`RetryPolicy`].

use crate::config::{self, RetryPolicy};
use crate::error::{CoinwatchError, Result};
use crate::models::{CoinInfo, DailyAverage, MarketChart, PriceRecord, PriceSample};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Result of fetching current prices for several coins.
#[derive(Debug, Clone, Default)]
pub struct CurrentPrices {
    /// Successfully fetched records, sorted by coin name.
    pub records: Vec<PriceRecord>,
    /// Identifiers whose lookup failed.
    pub failed: Vec<String>,
}

/// Blocking client for the CoinGecko v3 REST API.
pub struct CoinGeckoClient {
    base_url: String,
    transport: Box<dyn Transport>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CoinGeckoClient {
    /// Create a client; a trailing `/` on `base_url` is ignored.
    pub fn new(
        base_url: impl Into<String>,
        transport: Box<dyn Transport>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            timeout,
            retry,
        }
    }

    /// API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn coin_url(&self, identifier: &str) -> String {
        format!("{}/coins/{}", self.base_url, urlencoding::encode(identifier))
    }

    fn lookup(&self, identifier: &str) -> Result<HttpResponse> {
        let request = HttpRequest::get(self.coin_url(identifier), self.timeout);
        self.transport.get(&request)
    }

    /// Check whether the API knows the identifier.
    ///
    /// HTTP 200 means the coin exists; any other status means it does not.
    /// Transport failures are returned as errors.
    pub fn coin_exists(&self, identifier: &str) -> Result<bool> {
        let response = self.lookup(identifier)?;
        debug!(identifier, status = response.status, "coin lookup");
        Ok(response.is_ok())
    }

    /// Fetch the current USD price of a coin, stamped with local wall-clock time.
    pub fn current_price(&self, identifier: &str) -> Result<PriceRecord> {
        let response = self.lookup(identifier)?;
        if !response.is_ok() {
            return Err(CoinwatchError::Status {
                url: self.coin_url(identifier),
                status: response.status,
            });
        }
        let info: CoinInfo = serde_json::from_str(&response.body)?;
        let price = info.current_price(config::VS_CURRENCY).ok_or_else(|| {
            CoinwatchError::InvalidData(format!(
                "market_data.current_price.{} missing for {}",
                config::VS_CURRENCY,
                identifier
            ))
        })?;

        let now = Local::now().naive_local();
        let time = now.time().with_nanosecond(0).unwrap_or(now.time());
        Ok(PriceRecord {
            name: identifier.to_string(),
            symbol: info.symbol,
            date: now.date(),
            time,
            price_usd: price,
        })
    }

    /// Fetch current prices one coin at a time. Failed coins are logged and
    /// reported in [`CurrentPrices::failed`].
    pub fn current_prices<S: AsRef<str>>(&self, identifiers: &[S]) -> CurrentPrices {
        let mut result = CurrentPrices::default();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match self.current_price(identifier) {
                Ok(record) => result.records.push(record),
                Err(e) => {
                    warn!(identifier, error = %e, "current price unavailable");
                    result.failed.push(identifier.to_string());
                }
            }
        }
        result.records.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    /// Single attempt at the market chart endpoint.
    pub fn market_chart(&self, identifier: &str, days: u32) -> Result<Vec<PriceSample>> {
        let url = format!("{}/market_chart", self.coin_url(identifier));
        let request = HttpRequest::get(&url, self.timeout)
            .with_query("vs_currency", config::VS_CURRENCY)
            .with_query("days", days.to_string());

        let response = self.transport.get(&request)?;
        if !response.is_ok() {
            return Err(CoinwatchError::Status {
                url,
                status: response.status,
            });
        }

        let chart: MarketChart = serde_json::from_str(&response.body)?;
        Ok(chart
            .prices
            .into_iter()
            .map(|(ts, price)| PriceSample {
                timestamp_ms: ts as i64,
                price,
            })
            .collect())
    }

    /// Fetch the historical series and average it per local calendar date.
    ///
    /// Transport errors, non-200 statuses and unparsable payloads are retried
    /// up to the policy's attempt count with a fixed sleep in between. Once
    /// exhausted the call fails with [`CoinwatchError::Unavailable`].
    pub fn daily_averages(&self, identifier: &str, days: u32) -> Result<Vec<DailyAverage>> {
        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            let result = self
                .market_chart(identifier, days)
                .and_then(|samples| group_daily_averages(&samples, &Local));
            match result {
                Ok(series) => return Ok(series),
                Err(e) if e.is_retryable() => {
                    warn!(identifier, attempt, error = %e, "error while fetching market chart");
                    if attempt < attempts {
                        warn!(
                            "retrying in {} seconds",
                            self.retry.backoff.as_secs_f64()
                        );
                        thread::sleep(self.retry.backoff);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        error!(identifier, attempts, "unable to fetch market chart");
        Err(CoinwatchError::Unavailable {
            coin: identifier.to_string(),
            attempts,
        })
    }
}

/// Group samples by calendar date in `tz` and average each group.
///
/// Output is sorted by date, ascending.
pub fn group_daily_averages<Tz: TimeZone>(
    samples: &[PriceSample],
    tz: &Tz,
) -> Result<Vec<DailyAverage>> {
    let mut groups: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for sample in samples {
        let utc = DateTime::from_timestamp_millis(sample.timestamp_ms).ok_or_else(|| {
            CoinwatchError::InvalidData(format!("timestamp out of range: {}", sample.timestamp_ms))
        })?;
        let date = utc.with_timezone(tz).date_naive();
        let entry = groups.entry(date).or_insert((0.0, 0));
        entry.0 += sample.price;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(date, (sum, count))| DailyAverage {
            date,
            price: sum / count as f64,
        })
        .collect())
}
