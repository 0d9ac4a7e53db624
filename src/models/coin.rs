use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// CoinInfo - Subset of the `/coins/{id}` payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CoinInfo {
    pub id: Option<String>,
    pub symbol: String,
    pub name: Option<String>,
    pub market_data: Option<MarketData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
}

impl CoinInfo {
    /// Current price in the given quote currency (e.g. `"usd"`), if present.
    pub fn current_price(&self, currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.current_price.get(currency))
            .copied()
    }
}

// ---------------------------------------------------------------------------
// MarketChart - `/coins/{id}/market_chart` payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    /// `[timestampMillis, price]` pairs.
    pub prices: Vec<(f64, f64)>,
}
