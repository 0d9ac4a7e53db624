//! Smoke test against the live CoinGecko API.
//!
//! Uses a throwaway data directory and exercises the tracker end to end.
//!
//! Run with:
//! ```sh
//! cargo test -- --ignored --nocapture
//! ```

use coinwatch::chart::{render, PriceChart};
use coinwatch::Tracker;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Print a section header to stderr.
fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

/// Counters for pass/fail reporting.
struct Counters {
    pass: usize,
    fail: usize,
}

impl Counters {
    fn new() -> Self {
        Self { pass: 0, fail: 0 }
    }

    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let tmp = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::builder().data_dir(tmp.path()).build().unwrap();
    let mut c = Counters::new();

    section("REGISTRY");
    let added = tracker.add_coin("bitcoin");
    c.check("add bitcoin", added.is_ok(), &format!("{added:?}"));
    let bogus = tracker.add_coin("definitely-not-a-coin-xyz");
    c.check("reject unknown coin", bogus.is_err(), "");
    c.check(
        "registry persisted",
        std::fs::read_to_string(tracker.registry().path())
            .map(|s| s.contains("bitcoin"))
            .unwrap_or(false),
        "",
    );

    section("CURRENT PRICES");
    let update = tracker.fetch_current_prices(&["bitcoin"]);
    match update.stored {
        Ok(_) => {
            let prices = update.prices;
            c.check("one record", prices.records.len() == 1, "");
            if let Some(r) = prices.records.first() {
                c.check("positive price", r.price_usd > 0.0, &r.price_usd.to_string());
                c.check("symbol is btc", r.symbol == "btc", &r.symbol);
            }
            let history = tracker.history("bitcoin").unwrap_or_default();
            c.check("history has row", history.len() == 1, "");
            if let Ok(text) = render(&PriceChart::from_history("bitcoin", &history), 80, 20) {
                eprintln!("{text}");
            }
        }
        Err(e) => c.check("store current prices", false, &e.to_string()),
    }

    section("DAILY AVERAGES");
    match tracker.fetch_daily_averages("bitcoin", 7) {
        Ok(series) => {
            c.check("non-empty series", !series.is_empty(), &series.len().to_string());
            c.check(
                "dates ascending",
                series.windows(2).all(|w| w[0].date < w[1].date),
                "",
            );
        }
        Err(e) => c.check("fetch daily averages", false, &e.to_string()),
    }

    section("FAVORITES");
    c.check("add favorite", tracker.add_favorite("bitcoin").is_ok(), "");
    c.check("remove favorite", tracker.remove_favorite("bitcoin").is_ok(), "");

    eprintln!("\n{} passed, {} failed", c.pass, c.fail);
    assert_eq!(c.fail, 0, "{} smoke checks failed", c.fail);
}
