//! Ranking coins by the sum of their day-over-day percentage changes.

use crate::models::DailyAverage;

/// Score of a single coin.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinScore {
    pub coin: String,
    pub change: f64,
}

/// Outcome of ranking several coins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    /// Scores in input order.
    pub scores: Vec<CoinScore>,
    /// The series behind each score, in the same order.
    pub series: Vec<(String, Vec<DailyAverage>)>,
    /// Coins that had no data and were left out.
    pub skipped: Vec<String>,
}

impl Comparison {
    /// Highest summed change. Ties go to the coin listed first.
    pub fn best(&self) -> Option<&CoinScore> {
        let mut best: Option<&CoinScore> = None;
        let mut best_change = f64::NEG_INFINITY;
        for score in &self.scores {
            if score.change > best_change {
                best_change = score.change;
                best = Some(score);
            }
        }
        best
    }
}

/// Plain (non-compounded) sum of `(p[i] - p[i-1]) / p[i-1]`.
///
/// Fewer than two prices sum to zero. Steps from a zero price are skipped.
pub fn summed_pct_change(prices: &[f64]) -> f64 {
    prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .sum()
}

/// [`summed_pct_change`] over the prices of a daily series.
pub fn series_change(series: &[DailyAverage]) -> f64 {
    let prices: Vec<f64> = series.iter().map(|d| d.price).collect();
    summed_pct_change(&prices)
}

/// Score already-fetched series.
///
/// An empty series carries no data: the coin goes to
/// [`Comparison::skipped`] and cannot be picked as best.
pub fn rank<S: AsRef<str>>(series: &[(S, Vec<DailyAverage>)]) -> Comparison {
    let mut comparison = Comparison::default();
    for (coin, data) in series {
        let coin = coin.as_ref().to_string();
        if data.is_empty() {
            comparison.skipped.push(coin);
            continue;
        }
        comparison.scores.push(CoinScore {
            coin: coin.clone(),
            change: series_change(data),
        });
        comparison.series.push((coin, data.clone()));
    }
    comparison
}
