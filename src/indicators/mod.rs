// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free calculations over an ordered slice of OHLCV bars.
// Every function takes the bar sequence plus its period parameters, never
// mutates its input, and fails with `EngineError::InsufficientData` (carrying
// required vs. available counts) when the sequence is too short. Numeric edge
// cases (flat range, zero average loss, zero average volume) are defined
// outcomes, never errors.

pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stochastic;
pub mod volume;

pub use atr::atr;
pub use bollinger::{bollinger_bands, BollingerBands};
pub use macd::{macd, MacdResult};
pub use moving_average::{ema, sma};
pub use rsi::rsi;
pub use stochastic::{stochastic, StochasticResult};
pub use volume::volume_ratio;
