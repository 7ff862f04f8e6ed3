// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Seed average gain / average loss with the mean of the first
//          `period` close-to-close deltas.
// Step 2 — Smooth every later delta with weight (period - 1) / period:
//            avg_gain = (avg_gain * (period - 1) + gain) / period
//            avg_loss = (avg_loss * (period - 1) + loss) / period
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A zero average loss (no down moves) pins RSI at 100. Output is in [0, 100].

use crate::error::EngineError;
use crate::types::Bar;

/// RSI over the full series, needing at least `period + 1` bars.
pub fn rsi(bars: &[Bar], period: usize) -> Result<f64, EngineError> {
    if period == 0 || bars.len() < period + 1 {
        return Err(EngineError::insufficient(period + 1, bars.len()));
    }

    let period_f = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=period {
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += change.abs();
        }
    }
    avg_gain /= period_f;
    avg_loss /= period_f;

    for i in (period + 1)..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { change.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - (100.0 / (1.0 + rs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ascending, bars_from_closes, descending, flat};

    #[test]
    fn rsi_insufficient_data() {
        // period deltas need period + 1 closes.
        let bars = ascending(14, 1.0, 1.0);
        let err = rsi(&bars, 14).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientData {
                required: 15,
                available: 14
            }
        );
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = ascending(30, 1.0, 1.0);
        assert!((rsi(&bars, 14).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let bars = descending(30, 100.0, 1.0);
        assert!(rsi(&bars, 14).unwrap().abs() < 1e-10);
    }

    #[test]
    fn rsi_flat_market_has_no_losses() {
        // No movement means zero average loss, which pins RSI at 100.
        let bars = flat(30, 100.0);
        assert!((rsi(&bars, 14).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_stays_in_range() {
        let bars = bars_from_closes(&[
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ]);
        let value = rsi(&bars, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "RSI {value} out of range");
    }

    #[test]
    fn rsi_uptrend_exceeds_50() {
        // 50 bars rising from 100 to ~149.5 must carry an uptrend bias.
        let bars = ascending(50, 100.0, 1.01);
        assert!(rsi(&bars, 14).unwrap() > 50.0);
    }
}
