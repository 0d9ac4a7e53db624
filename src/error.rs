#[derive(Debug, thiserror::Error)]
pub enum CoinwatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("The cryptocurrency '{0}' does not exist")]
    UnknownCoin(String),

    #[error("The cryptocurrency '{0}' is not in the favorite list")]
    NotFavorite(String),

    #[error("Unable to fetch data for {coin} after {attempts} attempts")]
    Unavailable { coin: String, attempts: u32 },

    #[error("No data: {0}")]
    NoData(String),

    #[error("Nothing to plot for '{0}'")]
    EmptySeries(String),
}

impl CoinwatchError {
    /// Whether a failed historical fetch attempt may be retried.
    ///
    /// Transport failures, non-success statuses and malformed payloads are
    /// retried; local I/O and argument errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoinwatchError::Http(_)
                | CoinwatchError::Transport(_)
                | CoinwatchError::Status { .. }
                | CoinwatchError::Json(_)
                | CoinwatchError::InvalidData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoinwatchError>;
