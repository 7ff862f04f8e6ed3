// =============================================================================
// RSI Strategy
// =============================================================================
//
// Buy when RSI drops below the oversold threshold, sell when it rises above
// the overbought threshold. Confidence grows with the distance past the
// threshold: base 0.6 plus a scaled distance bonus, capped at 0.95.

use tracing::debug;

use crate::config::RsiParams;
use crate::error::EngineError;
use crate::indicators::rsi;
use crate::strategies::{error_signal, insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

pub struct RsiStrategy {
    params: RsiParams,
}

impl RsiStrategy {
    pub fn new(params: RsiParams) -> Self {
        Self { params }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Result<Signal, EngineError> {
        let value = rsi(bars, self.params.period)?;
        debug!(symbol, rsi = value, "RSI computed");

        let oversold = self.params.oversold;
        let overbought = self.params.overbought;

        let signal = if value < oversold {
            let confidence = buy_confidence(value, oversold);
            Signal::new(
                self.name(),
                symbol,
                SignalType::Buy,
                confidence,
                format!(
                    "RSI {value:.2} is below oversold threshold {oversold:.2}: potential reversal upward"
                ),
            )
        } else if value > overbought {
            let confidence = sell_confidence(value, overbought);
            Signal::new(
                self.name(),
                symbol,
                SignalType::Sell,
                confidence,
                format!(
                    "RSI {value:.2} is above overbought threshold {overbought:.2}: potential reversal downward"
                ),
            )
        } else {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.5,
                format!("RSI {value:.2} is in neutral zone ({oversold:.2} to {overbought:.2})"),
            )
        };

        Ok(signal)
    }
}

/// Lower RSI means a stronger buy case.
fn buy_confidence(value: f64, threshold: f64) -> f64 {
    let distance = threshold - value;
    (0.6 + (distance / threshold) * 0.35).min(0.95)
}

/// Higher RSI means a stronger sell case.
fn sell_confidence(value: f64, threshold: f64) -> f64 {
    let distance = value - threshold;
    (0.6 + (distance / (100.0 - threshold)) * 0.35).min(0.95)
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &str {
        "rsi"
    }

    fn description(&self) -> &str {
        "Momentum strategy using the Relative Strength Index"
    }

    fn min_bars(&self) -> usize {
        self.params.period + 5
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
