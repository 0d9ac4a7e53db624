//! Personal cryptocurrency price tracker.
//!
//! Keeps a registry of coin identifiers, fetches current and historical prices
//! from the CoinGecko API, appends them to CSV files, maintains a favorites
//! list and renders price charts in the terminal.
//!
//! # Quick start
//!
//! ```no_run
//! use coinwatch::Tracker;
//!
//! let mut tracker = Tracker::builder().data_dir("./data").build().unwrap();
//!
//! if !tracker.registry().exists("bitcoin") {
//!     tracker.add_coin("bitcoin").unwrap();
//! }
//! let update = tracker.fetch_current_prices(&["bitcoin"]);
//! update.stored.unwrap();
//! let series = tracker.fetch_daily_averages("bitcoin", 7).unwrap();
//! ```

pub mod chart;
pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod favorites;
pub mod menu;
pub mod models;
pub mod registry;
pub mod store;
pub mod transport;

pub use client::{CoinGeckoClient, CurrentPrices};
pub use compare::{CoinScore, Comparison};
pub use config::RetryPolicy;
pub use error::{CoinwatchError, Result};
pub use favorites::Favorites;
pub use menu::{Menu, MenuState};
pub use registry::Registry;
pub use store::PriceStore;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

use models::{DailyAverage, PriceRecord};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Outcome of [`Tracker::fetch_current_prices`].
#[derive(Debug)]
pub struct PriceUpdate {
    /// Fetched records and the coins that failed.
    pub prices: CurrentPrices,
    /// Number of rows appended to the price history, or why the append failed.
    pub stored: Result<usize>,
}

// ---------------------------------------------------------------------------
// TrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Tracker`].
pub struct TrackerBuilder {
    data_dir: Option<PathBuf>,
    api_base: String,
    timeout: Duration,
    retry: RetryPolicy,
    transport: Option<Box<dyn Transport>>,
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            api_base: config::API_BASE.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            transport: None,
        }
    }
}

impl TrackerBuilder {
    /// Start from defaults overridden by `COINWATCH_DATA_DIR`,
    /// `COINWATCH_API_URL` and `COINWATCH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::default();
        if let Ok(dir) = std::env::var(config::ENV_DATA_DIR) {
            builder = builder.data_dir(dir);
        }
        if let Ok(url) = std::env::var(config::ENV_API_URL) {
            builder = builder.api_base(url);
        }
        if let Ok(secs) = std::env::var(config::ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                CoinwatchError::InvalidArgument(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    config::ENV_TIMEOUT_SECS,
                    secs
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder)
    }

    /// Directory holding the registry, favorites and CSV files.
    ///
    /// Defaults to the platform data directory (e.g. `~/.local/share/coinwatch`
    /// on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Base URL of the CoinGecko v3 API.
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Per-request timeout. Defaults to 5 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry policy for historical fetches. Defaults to 3 attempts, 5 seconds apart.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the HTTP transport.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Create the data directory if needed and load the registry and favorites.
    pub fn build(self) -> Result<Tracker> {
        let data_dir = self.data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&data_dir)?;

        let transport = match self.transport {
            Some(t) => t,
            None => Box::new(ReqwestTransport::new()?),
        };
        let client = CoinGeckoClient::new(self.api_base, transport, self.timeout, self.retry);
        let registry = Registry::load_or_init(data_dir.join(config::REGISTRY_FILE))?;
        let favorites = Favorites::load(data_dir.join(config::FAVORITES_FILE))?;
        let store = PriceStore::in_dir(&data_dir);

        Ok(Tracker {
            data_dir,
            client,
            registry,
            favorites,
            store,
        })
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Owns the registry, favorites, API client and price store.
///
/// Every operation is synchronous and blocks on network and file I/O.
pub struct Tracker {
    data_dir: PathBuf,
    client: CoinGeckoClient,
    registry: Registry,
    favorites: Favorites,
    store: PriceStore,
}

impl Tracker {
    /// Start configuring a tracker.
    pub fn builder() -> TrackerBuilder {
        TrackerBuilder::default()
    }

    /// Directory holding the registry, favorites and CSV files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The CoinGecko client used for every request.
    pub fn client(&self) -> &CoinGeckoClient {
        &self.client
    }

    /// Registered coin identifiers.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The favorites list.
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// CSV tables for current prices and daily averages.
    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    // -- Registry ----------------------------------------------------------

    /// Validate a coin against the API and add it to the registry.
    ///
    /// Fails with [`CoinwatchError::InvalidArgument`] if it is already registered.
    pub fn add_coin(&mut self, identifier: &str) -> Result<()> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(CoinwatchError::InvalidArgument("empty coin name".into()));
        }
        if self.registry.exists(identifier) {
            return Err(CoinwatchError::InvalidArgument(format!(
                "{identifier} has already been added to the list"
            )));
        }
        self.registry.add(identifier, &self.client)
    }

    // -- Favorites ---------------------------------------------------------

    /// Mark a registered coin as favorite and save the list.
    pub fn add_favorite(&mut self, identifier: &str) -> Result<()> {
        self.favorites.add(identifier.trim(), &self.registry)
    }

    /// Drop a coin from the favorites and save the list.
    pub fn remove_favorite(&mut self, identifier: &str) -> Result<()> {
        self.favorites.remove(identifier.trim())
    }

    // -- Prices ------------------------------------------------------------

    /// Fetch current prices and append them to the price history.
    ///
    /// The fetched prices are returned even when the append fails; the
    /// write outcome is reported in [`PriceUpdate::stored`].
    pub fn fetch_current_prices<S: AsRef<str>>(&self, identifiers: &[S]) -> PriceUpdate {
        let prices = self.client.current_prices(identifiers);
        let stored = self.store.append_prices(&prices.records);
        if let Err(e) = &stored {
            warn!(error = %e, "unable to append current prices");
        }
        PriceUpdate { prices, stored }
    }

    /// Stored current-price observations for one coin.
    pub fn history(&self, identifier: &str) -> Result<Vec<PriceRecord>> {
        self.store.history(identifier)
    }

    /// Fetch the daily-average series and append it to the daily table.
    pub fn fetch_daily_averages(&self, identifier: &str, days: u32) -> Result<Vec<DailyAverage>> {
        let series = self.client.daily_averages(identifier, days)?;
        self.store.append_daily(identifier, &series)?;
        Ok(series)
    }

    /// Fetch each coin in turn and rank them by summed daily change.
    ///
    /// Coins whose fetch gives up ([`CoinwatchError::Unavailable`]) or whose
    /// series is empty are skipped and reported in [`Comparison::skipped`].
    /// Fails with [`CoinwatchError::NoData`] when no coin has data. Any other
    /// error, such as a failed write to the daily table, is returned as is.
    pub fn compare<S: AsRef<str>>(&self, identifiers: &[S], days: u32) -> Result<Comparison> {
        let mut fetched = Vec::new();
        let mut unavailable = Vec::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match self.fetch_daily_averages(identifier, days) {
                Ok(series) => fetched.push((identifier.to_string(), series)),
                Err(e @ CoinwatchError::Unavailable { .. }) => {
                    warn!(identifier, error = %e, "skipping coin in comparison");
                    unavailable.push(identifier.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        let mut comparison = compare::rank(&fetched);
        if comparison.scores.is_empty() {
            return Err(CoinwatchError::NoData(
                "none of the selected coins has price data".into(),
            ));
        }
        comparison.skipped.extend(unavailable);
        Ok(comparison)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tracker(data_dir={}, api={}, coins={}, favorites={})",
            self.data_dir.display(),
            self.client.base_url(),
            self.registry.len(),
            self.favorites.list().len()
        )
    }
}
