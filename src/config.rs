use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const VS_CURRENCY: &str = "usd";

pub const REGISTRY_FILE: &str = "coin_names.txt";
pub const FAVORITES_FILE: &str = "favorite_coins.json";
pub const PRICES_FILE: &str = "crypto_prices.csv";
pub const DAILY_FILE: &str = "daily_averages.csv";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

pub const CHART_WIDTH: u16 = 100;
pub const CHART_HEIGHT: u16 = 24;
pub const GRID_CELL_WIDTH: u16 = 60;
pub const GRID_CELL_HEIGHT: u16 = 18;
pub const GRID_COLUMNS: usize = 2;

pub const ENV_DATA_DIR: &str = "COINWATCH_DATA_DIR";
pub const ENV_API_URL: &str = "COINWATCH_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "COINWATCH_TIMEOUT_SECS";

/// Fixed-delay retry policy for the historical price endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Sleep between two consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

/// Platform data directory joined with `coinwatch`, or `.coinwatch` when the
/// platform has none.
pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("coinwatch")
    } else {
        PathBuf::from(".coinwatch")
    }
}
