// =============================================================================
// Consensus Aggregator — majority vote across strategies
// =============================================================================
//
// Tallies one signal per strategy into BUY/SELL/HOLD vote counts and declares
// the strictly-greatest category the consensus; any tie (including three-way)
// resolves to HOLD. Individual signals ride along for downstream display.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{Signal, SignalType};

/// Vote tally plus the per-strategy signals it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub symbol: String,
    pub total_strategies: usize,
    pub buy_votes: usize,
    pub sell_votes: usize,
    pub hold_votes: usize,
    pub consensus: SignalType,
    pub signals: Vec<Signal>,
}

/// Reduce one signal per strategy to a consensus decision.
pub fn aggregate(symbol: &str, signals: Vec<Signal>) -> ConsensusReport {
    let buy_votes = signals
        .iter()
        .filter(|s| s.signal_type == SignalType::Buy)
        .count();
    let sell_votes = signals
        .iter()
        .filter(|s| s.signal_type == SignalType::Sell)
        .count();
    let hold_votes = signals
        .iter()
        .filter(|s| s.signal_type == SignalType::Hold)
        .count();

    let consensus = if buy_votes > sell_votes && buy_votes > hold_votes {
        SignalType::Buy
    } else if sell_votes > buy_votes && sell_votes > hold_votes {
        SignalType::Sell
    } else {
        SignalType::Hold
    };

    info!(
        symbol,
        buy_votes, sell_votes, hold_votes, consensus = %consensus, "consensus computed"
    );

    ConsensusReport {
        symbol: symbol.to_string(),
        total_strategies: signals.len(),
        buy_votes,
        sell_votes,
        hold_votes,
        consensus,
        signals,
    }
}
