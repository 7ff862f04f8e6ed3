// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line = EMA(fast) - EMA(slow), reconstructed for each of the trailing
// `signal_period` + 1 slice end-points (end-points shorter than `slow` are
// skipped). The signal line seeds with the simple average of the first
// `signal_period` MACD samples and EMA-smooths any remaining samples with
// multiplier 2 / (signal_period + 1). Histogram = MACD - signal.

use crate::error::EngineError;
use crate::indicators::moving_average::ema;
use crate::types::Bar;

/// MACD line, signal line and histogram for the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute MACD with the given fast/slow/signal periods.
///
/// Requires `slow + signal_period` bars.
pub fn macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdResult, EngineError> {
    let required = slow + signal_period;
    if fast == 0 || slow == 0 || signal_period == 0 || bars.len() < required {
        return Err(EngineError::insufficient(required.max(1), bars.len()));
    }

    // MACD samples over the trailing window of slice end-points.
    let mut macd_values = Vec::with_capacity(signal_period + 1);
    for end in (bars.len() - signal_period)..=bars.len() {
        if end < slow {
            continue;
        }
        let slice = &bars[..end];
        macd_values.push(ema(slice, fast)? - ema(slice, slow)?);
    }

    let macd_line = macd_values.last().copied().unwrap_or(0.0);

    let mut signal_line = macd_line;
    if macd_values.len() >= signal_period {
        let multiplier = 2.0 / (signal_period as f64 + 1.0);
        signal_line =
            macd_values[..signal_period].iter().sum::<f64>() / signal_period as f64;
        for &value in &macd_values[signal_period..] {
            signal_line = (value - signal_line) * multiplier + signal_line;
        }
    }

    Ok(MacdResult {
        macd: macd_line,
        signal: signal_line,
        histogram: macd_line - signal_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ascending, bars_from_closes, flat};

    #[test]
    fn macd_insufficient_data() {
        let bars = ascending(30, 100.0, 1.0);
        let err = macd(&bars, 12, 26, 9).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientData {
                required: 35,
                available: 30
            }
        );
    }

    #[test]
    fn histogram_equals_macd_minus_signal() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.2)
            .collect();
        let bars = bars_from_closes(&closes);
        let result = macd(&bars, 12, 26, 9).unwrap();
        assert!((result.histogram - (result.macd - result.signal)).abs() < 1e-10);
    }

    #[test]
    fn macd_positive_in_steady_uptrend() {
        // Fast EMA sits above slow EMA when price keeps rising.
        let bars = ascending(60, 100.0, 1.0);
        let result = macd(&bars, 12, 26, 9).unwrap();
        assert!(result.macd > 0.0);
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let bars = flat(60, 100.0);
        let result = macd(&bars, 12, 26, 9).unwrap();
        assert!(result.macd.abs() < 1e-10);
        assert!(result.signal.abs() < 1e-10);
        assert!(result.histogram.abs() < 1e-10);
    }

    #[test]
    fn signal_line_matches_documented_formula() {
        // Reconstruct the trailing-slice samples by hand and check the
        // seed-average + EMA-smooth signal line against the implementation.
        let closes: Vec<f64> = (0..50)
            .map(|i| 100.0 + (i as f64 * 0.4).cos() * 3.0 + i as f64 * 0.1)
            .collect();
        let bars = bars_from_closes(&closes);
        let (fast, slow, signal_period) = (12usize, 26usize, 9usize);

        let mut samples = Vec::new();
        for end in (bars.len() - signal_period)..=bars.len() {
            if end < slow {
                continue;
            }
            let slice = &bars[..end];
            samples.push(ema(slice, fast).unwrap() - ema(slice, slow).unwrap());
        }
        let mut expected = samples[..signal_period].iter().sum::<f64>() / signal_period as f64;
        let mult = 2.0 / (signal_period as f64 + 1.0);
        for &value in &samples[signal_period..] {
            expected = (value - expected) * mult + expected;
        }

        let result = macd(&bars, fast, slow, signal_period).unwrap();
        assert!((result.signal - expected).abs() < 1e-10);
        assert!((result.macd - *samples.last().unwrap()).abs() < 1e-10);
    }
}
