// =============================================================================
// Volume Ratio
// =============================================================================
//
// Current bar's volume divided by the mean volume of the preceding `period`
// bars (the current bar is excluded from the average). A dead tape (zero
// average volume) yields a ratio of 0.0 rather than an error.

use crate::error::EngineError;
use crate::types::Bar;

/// Current volume relative to the trailing `period`-bar average.
pub fn volume_ratio(bars: &[Bar], period: usize) -> Result<f64, EngineError> {
    if period == 0 || bars.len() < period + 1 {
        return Err(EngineError::insufficient(period + 1, bars.len()));
    }

    let len = bars.len();
    let window = &bars[len - 1 - period..len - 1];
    let avg = window.iter().map(|b| b.volume as f64).sum::<f64>() / period as f64;

    if avg == 0.0 {
        return Ok(0.0);
    }

    Ok(bars[len - 1].volume as f64 / avg)
}
