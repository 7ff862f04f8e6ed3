// =============================================================================
// Moving Average Crossover Strategy
// =============================================================================
//
// Short average above the long average is an uptrend (BUY / stay long),
// below is a downtrend (SELL / stay flat). The golden/death cross itself is
// detected against the previous bar and called out in the rationale;
// confidence scales with the spread between the averages.

use tracing::debug;

use crate::config::MaCrossoverParams;
use crate::error::EngineError;
use crate::indicators::{ema, sma};
use crate::strategies::{error_signal, insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

pub struct MaCrossoverStrategy {
    params: MaCrossoverParams,
}

impl MaCrossoverStrategy {
    pub fn new(params: MaCrossoverParams) -> Self {
        Self { params }
    }

    fn average(&self, bars: &[Bar], period: usize) -> Result<f64, EngineError> {
        if self.params.use_ema {
            ema(bars, period)
        } else {
            sma(bars, period)
        }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Result<Signal, EngineError> {
        let short_period = self.params.short_period;
        let long_period = self.params.long_period;

        let short = self.average(bars, short_period)?;
        let long = self.average(bars, long_period)?;

        let previous = &bars[..bars.len() - 1];
        let prev_short = self.average(previous, short_period)?;
        let prev_long = self.average(previous, long_period)?;

        let ma_type = if self.params.use_ema { "EMA" } else { "SMA" };
        debug!(symbol, ma_type, short, long, "moving averages computed");

        let golden_cross = prev_short <= prev_long && short > long;
        let death_cross = prev_short >= prev_long && short < long;

        let confidence = spread_confidence(short, long);

        let signal = if short > long {
            let spread = (short - long) / long * 100.0;
            let reasoning = if golden_cross {
                format!(
                    "Golden cross: {ma_type}({short_period})={short:.2} crossed above {ma_type}({long_period})={long:.2}, entering uptrend"
                )
            } else {
                format!(
                    "Uptrend: {ma_type}({short_period})={short:.2} is {spread:.2}% above {ma_type}({long_period})={long:.2}"
                )
            };
            Signal::new(self.name(), symbol, SignalType::Buy, confidence, reasoning)
        } else {
            let spread = (long - short) / long * 100.0;
            let reasoning = if death_cross {
                format!(
                    "Death cross: {ma_type}({short_period})={short:.2} crossed below {ma_type}({long_period})={long:.2}, exiting to flat"
                )
            } else {
                format!(
                    "Downtrend: {ma_type}({short_period})={short:.2} is {spread:.2}% below {ma_type}({long_period})={long:.2}"
                )
            };
            Signal::new(self.name(), symbol, SignalType::Sell, confidence, reasoning)
        };

        Ok(signal)
    }
}

/// Wider spread between the averages means a stronger trend, bonus capped at
/// 0.15 over the 0.75 base.
fn spread_confidence(short: f64, long: f64) -> f64 {
    let percent_difference = ((short - long) / long).abs() * 100.0;
    let bonus = (percent_difference * 0.05).min(0.15);
    (0.75 + bonus).min(0.95)
}

impl Strategy for MaCrossoverStrategy {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn description(&self) -> &str {
        "Moving average crossover strategy, short-term trend via 10/20 averages"
    }

    fn min_bars(&self) -> usize {
        self.params.long_period + 5
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
