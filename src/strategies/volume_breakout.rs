// =============================================================================
// Volume Breakout Strategy
// =============================================================================
//
// A breakout needs both legs: volume above `volume_multiplier` times the
// trailing average AND an absolute close-to-close move past the price
// threshold. Direction follows the price move; targets sit 5% away with a 2%
// stop. One leg alone is a watch-and-wait HOLD.

use tracing::debug;

use crate::config::VolumeBreakoutParams;
use crate::error::EngineError;
use crate::indicators::volume_ratio;
use crate::strategies::{error_signal, insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

pub struct VolumeBreakoutStrategy {
    params: VolumeBreakoutParams,
}

impl VolumeBreakoutStrategy {
    pub fn new(params: VolumeBreakoutParams) -> Self {
        Self { params }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Result<Signal, EngineError> {
        let ratio = volume_ratio(bars, self.params.volume_period)?;

        let current = &bars[bars.len() - 1];
        let previous = &bars[bars.len() - 2];
        let price_change_pct = (current.close - previous.close) / previous.close * 100.0;

        let high_volume = ratio > self.params.volume_multiplier;
        let significant_move = price_change_pct.abs() > self.params.price_change_threshold_pct;
        let strong_breakout = price_change_pct.abs() > self.params.strong_breakout_pct;

        debug!(
            symbol,
            volume = current.volume,
            ratio,
            price_change_pct,
            "volume breakout inputs"
        );

        let signal = if high_volume && significant_move {
            let confidence =
                self.breakout_confidence(price_change_pct.abs(), ratio, strong_breakout);
            let strength_note = if strong_breakout {
                "Strong breakout signal."
            } else {
                "Moderate breakout."
            };
            if price_change_pct > 0.0 {
                Signal::new(
                    self.name(),
                    symbol,
                    SignalType::Buy,
                    confidence,
                    format!(
                        "Bullish volume breakout: price surged {price_change_pct:.2}% on {ratio:.1}x average volume. {strength_note}"
                    ),
                )
                .with_target(current.close * 1.05)
                .with_stop(current.close * 0.98)
            } else {
                Signal::new(
                    self.name(),
                    symbol,
                    SignalType::Sell,
                    confidence,
                    format!(
                        "Bearish volume breakout: price dropped {:.2}% on {ratio:.1}x average volume. {strength_note}",
                        price_change_pct.abs()
                    ),
                )
                .with_target(current.close * 0.95)
                .with_stop(current.close * 1.02)
            }
        } else if high_volume {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.6,
                format!(
                    "High volume ({ratio:.1}x avg) detected but price change ({price_change_pct:.2}%) below threshold. Watching for breakout."
                ),
            )
        } else if significant_move {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.4,
                format!(
                    "Price moved {price_change_pct:.2}% but on low volume ({ratio:.1}x avg). Breakout not confirmed."
                ),
            )
        } else {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.5,
                format!(
                    "Normal trading: volume {ratio:.1}x avg, price {price_change_pct:.2}%. No breakout detected."
                ),
            )
        };

        Ok(signal)
    }

    /// Base 0.70 plus bonuses for move size (up to 0.15), excess volume
    /// (up to 0.10) and strength (0.05), capped at 0.95.
    fn breakout_confidence(&self, price_change: f64, ratio: f64, strong: bool) -> f64 {
        let price_bonus = ((price_change / 5.0) * 0.15).min(0.15);
        let volume_bonus = (((ratio - self.params.volume_multiplier)
            / self.params.volume_multiplier)
            * 0.10)
            .min(0.10);
        let strong_bonus = if strong { 0.05 } else { 0.0 };

        (0.70 + price_bonus + volume_bonus + strong_bonus).min(0.95)
    }
}

impl Strategy for VolumeBreakoutStrategy {
    fn name(&self) -> &str {
        "volume_breakout"
    }

    fn description(&self) -> &str {
        "Identifies significant price moves confirmed by high trading volume"
    }

    fn min_bars(&self) -> usize {
        self.params.volume_period + 5
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
