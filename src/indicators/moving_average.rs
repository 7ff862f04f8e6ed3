// =============================================================================
// Simple and Exponential Moving Averages
// =============================================================================
//
// SMA: arithmetic mean of the last `period` closes.
//
// EMA: seeded with the SMA of the first `period` closes, then smoothed
// forward through every remaining bar:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}

use crate::error::EngineError;
use crate::types::Bar;

/// Simple moving average over the last `period` closes.
pub fn sma(bars: &[Bar], period: usize) -> Result<f64, EngineError> {
    if period == 0 || bars.len() < period {
        return Err(EngineError::insufficient(period.max(1), bars.len()));
    }

    let window = &bars[bars.len() - period..];
    let sum: f64 = window.iter().map(|b| b.close).sum();
    Ok(sum / period as f64)
}

/// Exponential moving average evaluated over the full series.
///
/// The first `period` closes seed the average; each later close is folded in
/// with weight `2 / (period + 1)`. Returns the final smoothed value.
pub fn ema(bars: &[Bar], period: usize) -> Result<f64, EngineError> {
    if period == 0 || bars.len() < period {
        return Err(EngineError::insufficient(period.max(1), bars.len()));
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut value: f64 = bars[..period].iter().map(|b| b.close).sum::<f64>() / period as f64;
    for bar in &bars[period..] {
        value = (bar.close - value) * multiplier + value;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ascending, bars_from_closes};

    #[test]
    fn sma_is_mean_of_last_period_closes() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let value = sma(&bars, 3).unwrap();
        assert!((value - 4.0).abs() < 1e-10);
    }

    #[test]
    fn sma_full_window() {
        let bars = bars_from_closes(&[2.0, 4.0, 6.0]);
        assert!((sma(&bars, 3).unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn sma_insufficient_data() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        let err = sma(&bars, 5).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientData {
                required: 5,
                available: 2
            }
        );
    }

    #[test]
    fn sma_period_zero_is_insufficient() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        assert!(sma(&bars, 0).is_err());
    }

    #[test]
    fn ema_seed_equals_sma_when_period_equals_length() {
        let bars = bars_from_closes(&[2.0, 4.0, 6.0]);
        assert!((ema(&bars, 3).unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA over [1..10]: seed = 3.0, multiplier = 1/3.
        let bars = ascending(10, 1.0, 1.0);
        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        for close in [6.0, 7.0, 8.0, 9.0, 10.0] {
            expected = (close - expected) * mult + expected;
        }
        assert!((ema(&bars, 5).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn ema_insufficient_data() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        assert!(ema(&bars, 5).is_err());
    }

    #[test]
    fn ema_tracks_rising_series_above_sma_seed() {
        let bars = ascending(60, 100.0, 1.0);
        let value = ema(&bars, 20).unwrap();
        // EMA lags the last close but sits well above the initial seed.
        assert!(value > 120.0);
        assert!(value < bars.last().unwrap().close);
    }
}
