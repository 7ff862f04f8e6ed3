// =============================================================================
// Trading Strategies
// =============================================================================
//
// One capability trait, one type per strategy. Every strategy wraps the
// indicator module with an immutable parameter struct and a deterministic
// signal/confidence rule. Strategies never propagate errors: below their
// declared minimum they answer HOLD/0.0 with an "insufficient data" rationale,
// and any internal calculation failure degrades to HOLD/0.0 with an "error"
// rationale.

pub mod bollinger;
pub mod ma_crossover;
pub mod macd;
pub mod rsi;
pub mod sentiment;
pub mod stochastic;
pub mod support_resistance;
pub mod volume_breakout;

pub use bollinger::BollingerBandsStrategy;
pub use ma_crossover::MaCrossoverStrategy;
pub use macd::MacdStrategy;
pub use rsi::RsiStrategy;
pub use sentiment::{NewsSentimentStrategy, SentimentSnapshot, SentimentSource};
pub use stochastic::StochasticStrategy;
pub use support_resistance::SupportResistanceStrategy;
pub use volume_breakout::VolumeBreakoutStrategy;

use tracing::{error, warn};

use crate::error::EngineError;
use crate::types::{Bar, Signal, SignalType};

/// Capability set shared by every signal generator.
///
/// `analyze` is total: it must return a signal for any input, converting
/// short histories and internal failures into HOLD signals instead of
/// surfacing them.
pub trait Strategy: Send + Sync {
    /// Registry key, e.g. `"rsi"`.
    fn name(&self) -> &str;

    /// One-line human description for listing surfaces.
    fn description(&self) -> &str;

    /// Minimum number of bars this strategy needs for a real answer.
    fn min_bars(&self) -> usize;

    /// Analyze the bar history (ascending, most recent last) and recommend.
    fn analyze(&self, symbol: &str, bars: &[Bar]) -> Signal;

    /// Pre-flight check before execution.
    fn validate(&self) -> bool {
        !self.name().is_empty()
    }

    /// Whether the strategy is safe to replay hundreds of times. Signal
    /// producers that call external services per data point opt out.
    fn is_backtestable(&self) -> bool {
        true
    }
}

/// HOLD/0.0 answer for a history shorter than the strategy's minimum.
pub(crate) fn insufficient_data_signal(
    strategy: &str,
    symbol: &str,
    required: usize,
    available: usize,
) -> Signal {
    warn!(
        strategy,
        symbol, required, available, "not enough bars for analysis"
    );
    Signal::new(
        strategy,
        symbol,
        SignalType::Hold,
        0.0,
        format!("Analysis skipped: insufficient data ({available} of {required} bars)"),
    )
}

/// HOLD/0.0 answer for an internal calculation failure.
pub(crate) fn error_signal(strategy: &str, symbol: &str, err: &EngineError) -> Signal {
    error!(strategy, symbol, error = %err, "analysis failed");
    Signal::new(
        strategy,
        symbol,
        SignalType::Hold,
        0.0,
        format!("Error in {strategy} calculation: {err}"),
    )
}
