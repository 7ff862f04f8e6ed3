// =============================================================================
// MACD Strategy
// =============================================================================
//
// Buy on a bullish crossover of the MACD line above the signal line, sell on
// a bearish crossover below it; the previous bar's MACD decides whether a
// crossover actually happened this bar. Without a crossover the histogram
// shades a HOLD toward bullish (0.6) or bearish (0.4) momentum.

use tracing::debug;

use crate::config::MacdParams;
use crate::error::EngineError;
use crate::indicators::macd;
use crate::strategies::{error_signal, insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

pub struct MacdStrategy {
    params: MacdParams,
}

impl MacdStrategy {
    pub fn new(params: MacdParams) -> Self {
        Self { params }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Result<Signal, EngineError> {
        let MacdParams { fast, slow, signal } = self.params.clone();

        let current = macd(bars, fast, slow, signal)?;
        let previous = macd(&bars[..bars.len() - 1], fast, slow, signal)?;

        debug!(
            symbol,
            macd = current.macd,
            signal = current.signal,
            histogram = current.histogram,
            "MACD computed"
        );

        let bullish_crossover =
            previous.macd <= previous.signal && current.macd > current.signal;
        let bearish_crossover =
            previous.macd >= previous.signal && current.macd < current.signal;

        let result = if bullish_crossover {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Buy,
                crossover_confidence(current.histogram, true),
                format!(
                    "Bullish MACD crossover detected. MACD: {:.4}, signal: {:.4}, histogram: {:.4}",
                    current.macd, current.signal, current.histogram
                ),
            )
        } else if bearish_crossover {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Sell,
                crossover_confidence(current.histogram, false),
                format!(
                    "Bearish MACD crossover detected. MACD: {:.4}, signal: {:.4}, histogram: {:.4}",
                    current.macd, current.signal, current.histogram
                ),
            )
        } else if current.histogram > 0.0 && current.macd > current.signal {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.6,
                format!(
                    "Bullish momentum continuing. Histogram: {:.4}",
                    current.histogram
                ),
            )
        } else if current.histogram < 0.0 && current.macd < current.signal {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.4,
                format!(
                    "Bearish momentum continuing. Histogram: {:.4}",
                    current.histogram
                ),
            )
        } else {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.5,
                "No clear MACD signal",
            )
        };

        Ok(result)
    }
}

/// Larger histogram magnitude means a stronger crossover, capped at 0.9.
fn crossover_confidence(histogram: f64, bullish: bool) -> f64 {
    let magnitude = histogram.abs();
    if (bullish && histogram > 0.0) || (!bullish && histogram < 0.0) {
        (0.65 + magnitude * 10.0).min(0.9)
    } else {
        0.6
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &str {
        "macd"
    }

    fn description(&self) -> &str {
        "Trend-following momentum strategy using MACD crossovers"
    }

    fn min_bars(&self) -> usize {
        self.params.slow + self.params.signal + 5
    }

    fn analyze(&self, symbol: &str, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_bars() {
            return insufficient_data_signal(self.name(), symbol, self.min_bars(), bars.len());
        }
        match self.evaluate(symbol, bars) {
            Ok(signal) => signal,
            Err(err) => error_signal(self.name(), symbol, &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ascending, bars_from_closes, flat};

    fn strategy() -> MacdStrategy {
        MacdStrategy::new(MacdParams::default())
    }

    #[test]
    fn short_history_returns_insufficient_hold() {
        let bars = ascending(39, 100.0, 1.0); // one below the 40-bar minimum
        let signal = strategy().analyze("TCS", &bars);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.reasoning.to_lowercase().contains("insufficient"));
    }

    #[test]
    fn accelerating_uptrend_reports_bullish_momentum() {
        // Slope change from 1 to 3 per bar: the fast EMA pulls ahead and the
        // MACD line keeps climbing above its signal line long after the
        // crossover, so the last bar is momentum continuation, not a cross.
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        for i in 0..40 {
            closes.push(139.0 + 3.0 * (i + 1) as f64);
        }
        let bars = bars_from_closes(&closes);
        let signal = strategy().analyze("TCS", &bars);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert!((signal.confidence - 0.6).abs() < 1e-10);
        assert!(signal.reasoning.contains("Bullish momentum"));
    }

    #[test]
    fn flat_series_has_no_clear_signal() {
        let bars = flat(60, 100.0);
        let signal = strategy().analyze("TCS", &bars);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert!((signal.confidence - 0.5).abs() < 1e-10);
    }

    #[test]
    fn v_bottom_produces_bullish_crossover_buy() {
        // A long decline followed by a sharp recovery drags the MACD line up
        // through the signal line.
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 - i as f64 * 2.0).collect();
        for i in 0..10 {
            closes.push(100.0 + i as f64 * 6.0);
        }
        let bars = bars_from_closes(&closes);

        // Find the bar where the crossover lands and check the signal there.
        let mut saw_buy = false;
        for end in 45..=bars.len() {
            let signal = strategy().analyze("TCS", &bars[..end]);
            if signal.signal_type == SignalType::Buy {
                assert!(signal.confidence >= 0.65);
                assert!(signal.confidence <= 0.9);
                assert!(signal.reasoning.contains("Bullish MACD crossover"));
                saw_buy = true;
                break;
            }
        }
        assert!(saw_buy, "expected a bullish crossover somewhere in the recovery");
    }

    #[test]
    fn peak_rollover_produces_bearish_crossover_sell() {
        let mut closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 2.0).collect();
        for i in 0..10 {
            closes.push(198.0 - i as f64 * 6.0);
        }
        let bars = bars_from_closes(&closes);

        let mut saw_sell = false;
        for end in 45..=bars.len() {
            let signal = strategy().analyze("TCS", &bars[..end]);
            if signal.signal_type == SignalType::Sell {
                assert!(signal.reasoning.contains("Bearish MACD crossover"));
                saw_sell = true;
                break;
            }
        }
        assert!(saw_sell, "expected a bearish crossover somewhere in the rollover");
    }
}
