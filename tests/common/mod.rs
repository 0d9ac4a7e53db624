//! Shared fixtures for the coinwatch integration tests.
//!
//! Network access is replaced by closures implementing `Transport`; every
//! test gets its own temporary data directory.

#![allow(dead_code)]

use coinwatch::{CoinwatchError, HttpRequest, HttpResponse, RetryPolicy, Tracker};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

pub type Requests = Rc<RefCell<Vec<HttpRequest>>>;

/// Retry policy with the production attempt count but a short backoff.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::fixed(3, Duration::from_millis(20))
}

/// Minimal `/coins/{id}` payload.
pub fn coin_json(id: &str, symbol: &str, usd: f64) -> String {
    serde_json::json!({
        "id": id,
        "symbol": symbol,
        "name": id,
        "market_data": { "current_price": { "usd": usd, "eur": usd * 0.9 } }
    })
    .to_string()
}

/// `/coins/{id}/market_chart` payload from `(timestamp_ms, price)` pairs.
pub fn chart_json(prices: &[(i64, f64)]) -> String {
    let prices: Vec<serde_json::Value> = prices
        .iter()
        .map(|(ts, p)| serde_json::json!([ts, p]))
        .collect();
    serde_json::json!({ "prices": prices, "market_caps": [], "total_volumes": [] }).to_string()
}

/// Milliseconds since the epoch for `day` days after 2024-01-01 at `hour`:00 UTC.
pub fn ts(day: i64, hour: i64) -> i64 {
    const JAN_1_2024_MS: i64 = 1_704_067_200_000;
    JAN_1_2024_MS + day * 86_400_000 + hour * 3_600_000
}

/// Wrap a handler so every request it sees is recorded.
pub fn recording<F>(
    handler: F,
) -> (
    impl Fn(&HttpRequest) -> coinwatch::Result<HttpResponse>,
    Requests,
)
where
    F: Fn(&HttpRequest) -> coinwatch::Result<HttpResponse>,
{
    let requests: Requests = Rc::new(RefCell::new(Vec::new()));
    let seen = requests.clone();
    let transport = move |req: &HttpRequest| {
        seen.borrow_mut().push(req.clone());
        handler(req)
    };
    (transport, requests)
}

/// Transport that knows a fixed set of coins.
///
/// `/coins/{id}` answers 200 for known coins and 404 otherwise;
/// `/coins/{id}/market_chart` answers with the given series, or 404.
pub fn fake_api(
    coins: Vec<(&'static str, &'static str, f64)>,
    charts: Vec<(&'static str, Vec<(i64, f64)>)>,
) -> impl Fn(&HttpRequest) -> coinwatch::Result<HttpResponse> {
    move |req: &HttpRequest| {
        let path = req
            .url
            .split("/coins/")
            .nth(1)
            .unwrap_or_default()
            .to_string();
        if let Some(id) = path.strip_suffix("/market_chart") {
            return Ok(match charts.iter().find(|(c, _)| *c == id) {
                Some((_, series)) => HttpResponse::ok_json(chart_json(series)),
                None => HttpResponse::new(404, r#"{"error":"coin not found"}"#),
            });
        }
        Ok(match coins.iter().find(|(c, _, _)| *c == path) {
            Some((id, symbol, usd)) => HttpResponse::ok_json(coin_json(id, symbol, *usd)),
            None => HttpResponse::new(404, r#"{"error":"coin not found"}"#),
        })
    }
}

/// Transport that fails every request before a status line is received.
pub fn unreachable() -> impl Fn(&HttpRequest) -> coinwatch::Result<HttpResponse> {
    |_req: &HttpRequest| Err(CoinwatchError::Transport("connection refused".into()))
}

pub fn write_registry(dir: &Path, coins: &[&str]) {
    let mut contents = coins.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(dir.join("coin_names.txt"), contents).unwrap();
}

/// A tracker rooted in `dir` using the given transport and a fast retry policy.
pub fn tracker_in<T>(dir: &Path, transport: T) -> Tracker
where
    T: Fn(&HttpRequest) -> coinwatch::Result<HttpResponse> + 'static,
{
    Tracker::builder()
        .data_dir(dir)
        .api_base("https://api.test/api/v3")
        .retry(fast_retry())
        .transport(transport)
        .build()
        .unwrap()
}
