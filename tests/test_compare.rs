//! Summed percentage change and best-coin selection.

mod common;

use chrono::NaiveDate;
use coinwatch::compare::{rank, summed_pct_change};
use coinwatch::models::DailyAverage;
use coinwatch::CoinwatchError;

fn series(prices: &[f64]) -> Vec<DailyAverage> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| DailyAverage {
            date: NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap(),
            price,
        })
        .collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn summed_change_is_plain_sum_of_steps() {
    let a = summed_pct_change(&[10.0, 11.0, 9.0]);
    let b = summed_pct_change(&[10.0, 10.5, 10.6]);
    assert!(approx(a, 0.10 - 2.0 / 11.0), "got {a}");
    assert!(approx(b, 0.05 + 0.1 / 10.5), "got {b}");
}

#[test]
fn summed_change_of_short_series_is_zero() {
    assert_eq!(summed_pct_change(&[]), 0.0);
    assert_eq!(summed_pct_change(&[42.0]), 0.0);
}

#[test]
fn steps_from_zero_price_are_skipped() {
    assert!(approx(summed_pct_change(&[0.0, 5.0, 10.0]), 1.0));
}

#[test]
fn rank_picks_the_highest_summed_change() {
    let comparison = rank(&[
        ("coin-a", series(&[10.0, 11.0, 9.0])),
        ("coin-b", series(&[10.0, 10.5, 10.6])),
    ]);

    let best = comparison.best().unwrap();
    assert_eq!(best.coin, "coin-b");
    assert!(approx(best.change, 0.0595));
    assert!(approx(comparison.scores[0].change, -0.0818));
}

#[test]
fn rank_ties_go_to_the_first_coin() {
    let comparison = rank(&[
        ("first", series(&[1.0, 2.0])),
        ("second", series(&[5.0, 10.0])),
    ]);
    assert_eq!(comparison.best().unwrap().coin, "first");
}

#[test]
fn negative_scores_still_produce_a_winner() {
    let comparison = rank(&[("down", series(&[10.0, 5.0]))]);
    assert_eq!(comparison.best().unwrap().coin, "down");
}

#[test]
fn rank_leaves_out_empty_series() {
    let comparison = rank(&[
        ("empty", series(&[])),
        ("down", series(&[10.0, 5.0])),
    ]);

    assert_eq!(comparison.skipped, vec!["empty".to_string()]);
    assert_eq!(comparison.scores.len(), 1);
    assert_eq!(comparison.series.len(), 1);
    assert_eq!(comparison.series[0].0, "down");
    let best = comparison.best().unwrap();
    assert_eq!(best.coin, "down");
    assert!(approx(best.change, -0.5));
}

#[test]
fn rank_of_nothing_has_no_best() {
    let empty: [(&str, Vec<DailyAverage>); 0] = [];
    assert!(rank(&empty).best().is_none());
}

#[test]
fn tracker_compare_skips_coins_that_fail_to_fetch() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_registry(tmp.path(), &["coin-a", "coin-b", "coin-c"]);
    let day = |d| common::ts(d, 12);
    let tracker = common::tracker_in(
        tmp.path(),
        common::fake_api(
            vec![],
            vec![
                ("coin-a", vec![(day(0), 10.0), (day(1), 11.0), (day(2), 9.0)]),
                ("coin-b", vec![(day(0), 10.0), (day(1), 10.5), (day(2), 10.6)]),
            ],
        ),
    );

    let comparison = tracker.compare(&["coin-a", "coin-c", "coin-b"], 3).unwrap();

    assert_eq!(comparison.skipped, vec!["coin-c".to_string()]);
    assert_eq!(comparison.scores.len(), 2);
    assert_eq!(comparison.best().unwrap().coin, "coin-b");
}

#[test]
fn tracker_compare_fails_when_nothing_could_be_fetched() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_registry(tmp.path(), &["coin-a"]);
    let tracker = common::tracker_in(tmp.path(), common::unreachable());

    assert!(matches!(
        tracker.compare(&["coin-a"], 3),
        Err(CoinwatchError::NoData(_))
    ));
}

#[test]
fn tracker_compare_skips_coin_with_empty_series() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_registry(tmp.path(), &["empty", "down"]);
    let tracker = common::tracker_in(
        tmp.path(),
        common::fake_api(
            vec![],
            vec![
                ("empty", vec![]),
                ("down", vec![(common::ts(0, 12), 10.0), (common::ts(1, 12), 5.0)]),
            ],
        ),
    );

    let comparison = tracker.compare(&["empty", "down"], 2).unwrap();

    assert_eq!(comparison.skipped, vec!["empty".to_string()]);
    assert_eq!(comparison.best().unwrap().coin, "down");
}

#[test]
fn tracker_compare_of_only_empty_series_is_no_data() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_registry(tmp.path(), &["empty"]);
    let tracker = common::tracker_in(
        tmp.path(),
        common::fake_api(vec![], vec![("empty", vec![])]),
    );

    assert!(matches!(
        tracker.compare(&["empty"], 2),
        Err(CoinwatchError::NoData(_))
    ));
}

#[test]
fn tracker_compare_returns_local_write_errors() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_registry(tmp.path(), &["coin-a"]);
    std::fs::create_dir(tmp.path().join("daily_averages.csv")).unwrap();
    let (transport, requests) = common::recording(common::fake_api(
        vec![],
        vec![("coin-a", vec![(common::ts(0, 12), 10.0)])],
    ));
    let tracker = common::tracker_in(tmp.path(), transport);

    let result = tracker.compare(&["coin-a"], 1);

    assert!(matches!(result, Err(CoinwatchError::Io(_))), "got {result:?}");
    assert_eq!(requests.borrow().len(), 1);
}
