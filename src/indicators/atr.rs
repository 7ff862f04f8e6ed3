// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// True range per bar = max(high - low, |high - prev_close|, |low - prev_close|).
// ATR is the simple mean of the last `period` true ranges, so `period + 1`
// bars are required (the first bar only supplies a previous close).

use crate::error::EngineError;
use crate::types::Bar;

/// Simple-mean ATR over the last `period` true ranges.
pub fn atr(bars: &[Bar], period: usize) -> Result<f64, EngineError> {
    if period == 0 || bars.len() < period + 1 {
        return Err(EngineError::insufficient(period + 1, bars.len()));
    }

    let mut true_ranges = Vec::with_capacity(bars.len() - 1);
    for i in 1..bars.len() {
        let high = bars[i].high;
        let low = bars[i].low;
        let prev_close = bars[i - 1].close;

        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());
        true_ranges.push(tr);
    }

    let window = &true_ranges[true_ranges.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bar, flat};

    #[test]
    fn atr_insufficient_data() {
        let bars = flat(14, 100.0);
        let err = atr(&bars, 14).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientData {
                required: 15,
                available: 14
            }
        );
    }

    #[test]
    fn atr_of_constant_range_bars() {
        // Fixture bars have high = close + 1 and low = close - 2; on a flat
        // series the true range is the 3.0 high-low spread every bar.
        let bars = flat(20, 100.0);
        assert!((atr(&bars, 14).unwrap() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn atr_picks_up_gaps() {
        // A large gap between closes dominates the high-low spread.
        let mut bars = flat(15, 100.0);
        bars.push(bar(15, 130.0));
        let value = atr(&bars, 15).unwrap();
        assert!(value > 3.0, "gap should lift ATR, got {value}");
    }

    #[test]
    fn atr_is_never_negative() {
        let bars = flat(20, 100.0);
        assert!(atr(&bars, 5).unwrap() >= 0.0);
    }
}
