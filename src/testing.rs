// =============================================================================
// Shared test fixtures
// =============================================================================
//
// Compiled only for tests. Bars are stamped one day apart starting at a fixed
// date so every fixture series is strictly ascending and reproducible.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::Bar;

/// Fixed origin for fixture timestamps.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// One daily bar `i` days after the origin with a narrow range around `close`.
pub fn bar(i: usize, close: f64) -> Bar {
    Bar {
        timestamp: base_time() + Duration::days(i as i64),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1_000_000,
    }
}

/// Build a daily series from closing prices.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| bar(i, close))
        .collect()
}

/// Build a daily series from (close, volume) pairs.
pub fn bars_with_volumes(points: &[(f64, u64)]) -> Vec<Bar> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(close, volume))| {
            let mut bar = bar(i, close);
            bar.volume = volume;
            bar
        })
        .collect()
}

/// A steadily rising series: close = start + i * step.
pub fn ascending(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| bar(i, start + i as f64 * step))
        .collect()
}

/// A steadily falling series: close = start - i * step.
pub fn descending(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| bar(i, start - i as f64 * step))
        .collect()
}

/// A flat series pinned at `close`.
pub fn flat(n: usize, close: f64) -> Vec<Bar> {
    (0..n).map(|i| bar(i, close)).collect()
}
