// =============================================================================
// Shared types used across the Vega quant engine
// =============================================================================
//
// Bars are produced externally (history fetch / persistence) and are read-only
// to the engine. Sequences handed to any calculation must be in strictly
// ascending timestamp order with no duplicates; callers own the ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single OHLCV observation for a fixed time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Directional recommendation emitted by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// Side of a simulated position. The simulator is long-only; the enum keeps
/// the trade record honest about what it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// A strategy's recommendation with confidence and rationale.
///
/// Immutable once produced. `confidence` is in [0, 1]; `reasoning` is the
/// human-readable numeric basis for the decision (consumed by display layers,
/// never by the simulator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub strategy: String,
    pub symbol: String,
    pub signal_type: SignalType,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
}

impl Signal {
    /// Build a plain signal without target/stop levels.
    pub fn new(
        strategy: &str,
        symbol: &str,
        signal_type: SignalType,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            strategy: strategy.to_string(),
            symbol: symbol.to_string(),
            signal_type,
            confidence,
            reasoning: reasoning.into(),
            target_price: None,
            stop_loss: None,
        }
    }

    /// Attach a target price to the signal.
    pub fn with_target(mut self, target: f64) -> Self {
        self.target_price = Some(target);
        self
    }

    /// Attach a stop-loss price to the signal.
    pub fn with_stop(mut self, stop: f64) -> Self {
        self.stop_loss = Some(stop);
        self
    }
}

/// One completed round trip produced by the simulator. Append-only; once
/// recorded, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: DateTime<Utc>,
    pub exit_date: DateTime<Utc>,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: u32,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub holding_period_days: i64,
}

/// One point of the equity curve. Recorded once per processed bar whether or
/// not a trade occurred. `drawdown` is the distance below the running peak,
/// never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub drawdown: f64,
}
