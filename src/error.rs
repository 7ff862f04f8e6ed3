// =============================================================================
// Engine error taxonomy
// =============================================================================
//
// `InsufficientData` is the only recoverable kind: strategies catch it and
// degrade to a HOLD signal. Everything else is surfaced to the caller and is
// fatal for that call. Numeric edge cases (zero variance, zero average loss,
// zero trades) are defined outcomes in the calculators, never errors.

use thiserror::Error;

/// The unified error type for the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Too few bars for the requested calculation or period.
    #[error("insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Strategy name is not registered.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Strategy opted out of backtesting (live external calls per data point).
    #[error("strategy '{0}' cannot be backtested — it performs live external calls per data point")]
    NotBacktestable(String),

    /// No historical bars for the requested instrument/range.
    #[error("no historical bars available for {0}")]
    EmptyHistory(String),

    /// Strategy failed its own pre-flight validation.
    #[error("strategy validation failed: {0}")]
    ValidationFailed(String),

    /// Backtest capital must be strictly positive.
    #[error("initial capital must be positive, got {0}")]
    InvalidCapital(f64),
}

impl EngineError {
    /// Shorthand used by every indicator's length guard.
    pub fn insufficient(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }
}
