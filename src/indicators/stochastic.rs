// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
// %K = (close - lowest_low) / (highest_high - lowest_low) * 100 over a
// `period`-bar window, pinned at 50 when the window's range is zero.
// %K is evaluated for the trailing `d_period` windows ending at successive
// bars; %D is the simple average of the last `d_period` %K values (or fewer
// when history is short). Both outputs live in [0, 100].

use crate::error::EngineError;
use crate::types::Bar;

/// Most recent %K and %D values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticResult {
    pub percent_k: f64,
    pub percent_d: f64,
}

/// Compute the stochastic oscillator over `period` bars with a `d_period` %D
/// average.
pub fn stochastic(
    bars: &[Bar],
    period: usize,
    d_period: usize,
) -> Result<StochasticResult, EngineError> {
    if period == 0 || d_period == 0 || bars.len() < period {
        return Err(EngineError::insufficient(period.max(1), bars.len()));
    }

    let start = bars.len().saturating_sub(period + d_period - 1);

    let mut k_values = Vec::with_capacity(d_period);
    let mut end = start + period;
    while end <= bars.len() {
        let window = &bars[end - period..end];
        let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let close = window[window.len() - 1].close;

        let range = highest - lowest;
        let k = if range == 0.0 {
            50.0
        } else {
            (close - lowest) / range * 100.0
        };
        k_values.push(k);
        end += 1;
    }

    let percent_k = k_values.last().copied().unwrap_or(50.0);
    let tail = &k_values[k_values.len().saturating_sub(d_period)..];
    let percent_d = if tail.is_empty() {
        percent_k
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    Ok(StochasticResult {
        percent_k,
        percent_d,
    })
}
