// =============================================================================
// Bollinger Bands Strategy — mean reversion
// =============================================================================
//
// Buy when the close touches the lower band, sell when it touches the upper
// band (touch = within `touch_threshold_pct` of the band). A narrow band
// (width below `squeeze_width_pct` of the middle) is a squeeze: hold and wait
// for direction. Otherwise hold with a mild bias for which side of the middle
// band the price is on.

use tracing::debug;

use crate::config::BollingerParams;
use crate::error::EngineError;
use crate::indicators::bollinger_bands;
use crate::strategies::{error_signal, insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

pub struct BollingerBandsStrategy {
    params: BollingerParams,
}

impl BollingerBandsStrategy {
    pub fn new(params: BollingerParams) -> Self {
        Self { params }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Result<Signal, EngineError> {
        let bands = bollinger_bands(bars, self.params.period, self.params.std_dev_multiplier)?;
        let price = bars[bars.len() - 1].close;
        let width_pct = bands.width_pct();

        debug!(
            symbol,
            upper = bands.upper,
            middle = bands.middle,
            lower = bands.lower,
            price,
            width_pct,
            "Bollinger Bands computed"
        );

        let distance_from_lower_pct = (price - bands.lower) / bands.lower * 100.0;
        let distance_from_upper_pct = (bands.upper - price) / bands.upper * 100.0;

        let signal = if distance_from_lower_pct <= self.params.touch_threshold_pct {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Buy,
                touch_confidence(price, bands.lower, bands.middle),
                format!(
                    "Price {price:.2} touching lower band {:.2} ({:.2}% away). Mean reversion expected. Band width: {width_pct:.2}%",
                    bands.lower,
                    distance_from_lower_pct.abs()
                ),
            )
        } else if distance_from_upper_pct <= self.params.touch_threshold_pct {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Sell,
                touch_confidence(price, bands.upper, bands.middle),
                format!(
                    "Price {price:.2} touching upper band {:.2} ({:.2}% away). Mean reversion expected. Band width: {width_pct:.2}%",
                    bands.upper,
                    distance_from_upper_pct.abs()
                ),
            )
        } else if width_pct < self.params.squeeze_width_pct {
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.5,
                format!(
                    "Band squeeze detected (width: {width_pct:.2}%). Low volatility, potential breakout coming. Wait for direction."
                ),
            )
        } else if price > bands.middle {
            let percent_above = (price - bands.middle) / bands.middle * 100.0;
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.55,
                format!(
                    "Price {price:.2} is {percent_above:.2}% above middle band {:.2}. Moderate bullish momentum.",
                    bands.middle
                ),
            )
        } else {
            let percent_below = (bands.middle - price) / bands.middle * 100.0;
            Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.45,
                format!(
                    "Price {price:.2} is {percent_below:.2}% below middle band {:.2}. Moderate bearish momentum.",
                    bands.middle
                ),
            )
        };

        Ok(signal)
    }
}

/// Closer to the band means a stronger mean-reversion case: base 0.7 plus a
/// proximity bonus, capped at 0.95.
fn touch_confidence(price: f64, band: f64, middle: f64) -> f64 {
    let distance_from_band = (price - band).abs();
    let half_width = (band - middle).abs();
    if half_width == 0.0 {
        // Collapsed bands: price sits exactly on every band.
        return 0.9;
    }

    let position_ratio = distance_from_band / half_width;
    (0.7 + (1.0 - position_ratio) * 0.2).min(0.95)
}

impl Strategy for BollingerBandsStrategy {
    fn name(&self) -> &str {
        "bollinger"
    }

    fn description(&self) -> &str {
        "Mean reversion strategy using Bollinger Bands"
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
