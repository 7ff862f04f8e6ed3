// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(period); band offset = k * population standard deviation
// of the last `period` closes around the middle. Upper = middle + offset,
// lower = middle - offset, so upper >= middle >= lower for any valid input.

use crate::error::EngineError;
use crate::indicators::moving_average::sma;
use crate::types::Bar;

/// Upper, middle and lower band for the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Band width as a percentage of the middle band.
    pub fn width_pct(&self) -> f64 {
        if self.middle == 0.0 {
            return 0.0;
        }
        (self.upper - self.lower) / self.middle * 100.0
    }
}

/// Compute Bollinger Bands over the last `period` closes.
pub fn bollinger_bands(
    bars: &[Bar],
    period: usize,
    std_dev_multiplier: f64,
) -> Result<BollingerBands, EngineError> {
    let middle = sma(bars, period)?;

    let window = &bars[bars.len() - period..];
    let variance = window
        .iter()
        .map(|b| (b.close - middle).powi(2))
        .sum::<f64>()
        / period as f64;
    let offset = std_dev_multiplier * variance.sqrt();

    Ok(BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
    })
}
