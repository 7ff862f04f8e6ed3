// =============================================================================
// Stochastic Oscillator Strategy
// =============================================================================
//
// Buy when %K sits in the oversold zone, sell when it sits in the overbought
// zone. A %K/%D crossover in the signal's direction on the current bar adds a
// 0.10 confidence bonus; both paths cap at 0.95.

use tracing::debug;

use crate::config::StochasticParams;
use crate::error::EngineError;
use crate::indicators::stochastic;
use crate::strategies::{error_signal, insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

pub struct StochasticStrategy {
    params: StochasticParams,
}

impl StochasticStrategy {
    pub fn new(params: StochasticParams) -> Self {
        Self { params }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Result<Signal, EngineError> {
        let StochasticParams {
            k_period,
            d_period,
            oversold,
            overbought,
        } = self.params.clone();

        let current = stochastic(bars, k_period, d_period)?;
        let previous = stochastic(&bars[..bars.len() - 1], k_period, d_period)?;

        debug!(
            symbol,
            percent_k = current.percent_k,
            percent_d = current.percent_d,
            "stochastic computed"
        );

        let bullish_crossover = previous.percent_k <= previous.percent_d
            && current.percent_k > current.percent_d;
        let bearish_crossover = previous.percent_k >= previous.percent_d
            && current.percent_k < current.percent_d;

        let signal = if current.percent_k < oversold {
            let mut confidence = zone_confidence(oversold - current.percent_k, oversold);
            if bullish_crossover {
                confidence = (confidence + 0.10).min(0.95);
            }
            let crossover_note = if bullish_crossover {
                " with bullish crossover"
            } else {
                ""
            };
            Signal::new(
                self.name(),
                symbol,
                SignalType::Buy,
                confidence,
                format!(
                    "Stochastic oversold (%K={:.2} < {oversold:.0}){crossover_note}. Reversal signal.",
                    current.percent_k
                ),
            )
        } else if current.percent_k > overbought {
            let mut confidence =
                zone_confidence(current.percent_k - overbought, 100.0 - overbought);
            if bearish_crossover {
                confidence = (confidence + 0.10).min(0.95);
            }
            let crossover_note = if bearish_crossover {
                " with bearish crossover"
            } else {
                ""
            };
            Signal::new(
                self.name(),
                symbol,
                SignalType::Sell,
                confidence,
                format!(
                    "Stochastic overbought (%K={:.2} > {overbought:.0}){crossover_note}. Reversal signal.",
                    current.percent_k
                ),
            )
        } else {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.5,
                format!(
                    "Stochastic neutral (%K={:.2}, %D={:.2}), no clear signal.",
                    current.percent_k, current.percent_d
                ),
            )
        };

        Ok(signal)
    }
}

/// Deeper into the zone means a stronger reversal case: base 0.7 plus a
/// distance bonus scaled by the zone size, capped at 0.95.
fn zone_confidence(distance: f64, zone_size: f64) -> f64 {
    (0.7 + (distance / zone_size) * 0.25).min(0.95)
}

impl Strategy for StochasticStrategy {
    fn name(&self) -> &str {
        "stochastic"
    }

    fn description(&self) -> &str {
        "Momentum indicator comparing the closing price to its range over time"
    }

    fn min_bars(&self) -> usize {
        self.params.k_period + self.params.d_period + 5
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
    use crate::testing::{ascending, bars_from_closes, descending};

    fn strategy() -> StochasticStrategy {
        StochasticStrategy::new(StochasticParams::default())
    }

    #[test]
    fn short_history_returns_insufficient_hold() {
        let bars = ascending(21, 100.0, 1.0); // minimum is 22
        let signal = strategy().analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.reasoning.to_lowercase().contains("insufficient"));
    }

    #[test]
    fn downtrend_is_oversold_buy() {
        let bars = descending(30, 200.0, 2.0);
        let signal = strategy().analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Buy);
        assert!(signal.confidence >= 0.7);
        assert!(signal.confidence <= 0.95);
        assert!(signal.reasoning.contains("oversold"));
    }

    #[test]
    fn uptrend_is_overbought_sell() {
        let bars = ascending(30, 100.0, 2.0);
        let signal = strategy().analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Sell);
        assert!(signal.reasoning.contains("overbought"));
    }

    #[test]
    fn choppy_middle_is_neutral_hold() {
        let closes: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 2.1).sin() * 1.5)
            .collect();
        let bars = bars_from_closes(&closes);
        let signal = strategy().analyze("INFY", &bars);
        // %K oscillates around the middle of the range here.
        if signal.signal_type == SignalType::Hold {
            assert!((signal.confidence - 0.5).abs() < 1e-10);
            assert!(signal.reasoning.contains("neutral"));
        }
    }

    #[test]
    fn confidence_never_exceeds_cap() {
        // Extreme oversold: %K at 0 with a bullish crossover bonus on top.
        let bars = descending(40, 400.0, 5.0);
        let signal = strategy().analyze("INFY", &bars);
        assert!(signal.confidence <= 0.95);
    }
}
