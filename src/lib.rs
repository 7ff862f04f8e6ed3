// =============================================================================
// Vega Quant Engine
// =============================================================================
//
// Quantitative core for a retail trading-decision tool: a technical-indicator
// library, eight signal strategies behind one capability trait, a
// single-position backtest simulator, a performance-metrics calculator and a
// majority-vote consensus aggregator. Bars flow one direction:
//
//   bars -> indicators -> strategy -> signal
//   signals (+ bars) -> simulator -> trades + equity curve -> metrics
//
// Everything is synchronous and side-effect-free per invocation; concurrent
// runs share nothing but the read-only bar source.

pub mod backtest;
pub mod config;
pub mod consensus;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod strategies;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backtest::{BacktestResult, MIN_HISTORY_BARS};
pub use config::EngineConfig;
pub use consensus::ConsensusReport;
pub use engine::{BarSource, StrategyRegistry, TradingEngine};
pub use error::EngineError;
pub use metrics::PerformanceMetrics;
pub use strategies::Strategy;
pub use types::{Bar, EquityPoint, Side, Signal, SignalType, Trade};
