// =============================================================================
// Backtest Simulator — FLAT/LONG state machine over a chronological replay
// =============================================================================
//
// One simulated cash account and at most one open position per run. Per bar:
// skip until 20 bars of history exist, ask the strategy for a signal, apply
// the transition (FLAT + BUY opens at 95% of cash, LONG + SELL closes at the
// bar's close, everything else is a no-op), then record one equity point.
// A position still open after the last bar is force-closed there. Strategy
// failures never abort a run: the strategy's own error handling turns them
// into HOLD signals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::EngineError;
use crate::metrics::{compute_metrics, round_half_up, PerformanceMetrics};
use crate::strategies::Strategy;
use crate::types::{Bar, EquityPoint, Side, SignalType, Trade};

/// Hard warm-up floor: bars seen before any signal is requested. Independent
/// of the strategy's own minimum.
pub const MIN_HISTORY_BARS: usize = 20;

/// Fraction of cash deployed when opening a position; the rest stays as a
/// buffer and is never invested.
const POSITION_FRACTION: f64 = 0.95;

/// Everything a completed run produced. Built once at the end of the replay
/// and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub run_id: Uuid,
    pub strategy_name: String,
    pub symbol: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub metrics: PerformanceMetrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

/// The one open position a run may hold.
#[derive(Debug, Clone)]
struct OpenPosition {
    entry_timestamp: DateTime<Utc>,
    entry_price: f64,
    quantity: u32,
    side: Side,
}

/// Cash account and drawdown tracker for a single run. Owned by the run,
/// never shared.
struct SimState {
    cash: f64,
    peak_equity: f64,
}

impl SimState {
    fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            peak_equity: initial_capital,
        }
    }

    /// Open a long position sized at 95% of cash, truncated to whole shares.
    /// Returns `None` when cash buys less than one share.
    fn open_position(&mut self, price: f64, timestamp: DateTime<Utc>) -> Option<OpenPosition> {
        let budget = self.cash * POSITION_FRACTION;
        let quantity = (budget / price).floor() as u32;
        if quantity == 0 {
            return None;
        }

        self.cash -= price * quantity as f64;
        Some(OpenPosition {
            entry_timestamp: timestamp,
            entry_price: price,
            quantity,
            side: Side::Long,
        })
    }

    /// Close the position at `exit_price`, realize the result as a trade.
    fn close_position(
        &mut self,
        position: OpenPosition,
        exit_price: f64,
        exit_timestamp: DateTime<Utc>,
    ) -> Trade {
        let quantity = position.quantity as f64;
        let proceeds = exit_price * quantity;
        self.cash += proceeds;

        let cost = position.entry_price * quantity;
        let profit_loss = proceeds - cost;
        let profit_loss_pct = round_half_up(profit_loss / cost, 4) * 100.0;

        Trade {
            entry_date: position.entry_timestamp,
            exit_date: exit_timestamp,
            side: position.side,
            entry_price: position.entry_price,
            exit_price,
            quantity: position.quantity,
            profit_loss,
            profit_loss_pct,
            holding_period_days: (exit_timestamp - position.entry_timestamp).num_days(),
        }
    }

    /// Mark-to-market equity: cash plus open position value, if any.
    fn equity(&self, position: Option<&OpenPosition>, price: f64) -> f64 {
        match position {
            Some(open) => self.cash + open.quantity as f64 * price,
            None => self.cash,
        }
    }

    /// Distance below the running peak; the peak ratchets up on new highs.
    fn update_drawdown(&mut self, equity: f64) -> f64 {
        if equity > self.peak_equity {
            self.peak_equity = equity;
            return 0.0;
        }
        self.peak_equity - equity
    }
}

/// Replay `strategy` over `bars` with one cash account and one position slot.
///
/// Fails fast, with no partial run, when the strategy opted out of
/// backtesting, the bar sequence is empty, or the capital is not positive.
pub fn run_backtest(
    strategy: &dyn Strategy,
    symbol: &str,
    bars: &[Bar],
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    initial_capital: f64,
) -> Result<BacktestResult, EngineError> {
    if !strategy.is_backtestable() {
        return Err(EngineError::NotBacktestable(strategy.name().to_string()));
    }
    if bars.is_empty() {
        return Err(EngineError::EmptyHistory(symbol.to_string()));
    }
    if initial_capital <= 0.0 {
        return Err(EngineError::InvalidCapital(initial_capital));
    }

    info!(
        strategy = strategy.name(),
        symbol,
        bars = bars.len(),
        initial_capital,
        "starting backtest"
    );

    let mut state = SimState::new(initial_capital);
    let mut position: Option<OpenPosition> = None;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::new();

    for i in 0..bars.len() {
        let history = &bars[..=i];
        if history.len() < MIN_HISTORY_BARS {
            continue;
        }

        let bar = &bars[i];
        let signal = strategy.analyze(symbol, history);

        match signal.signal_type {
            SignalType::Buy if position.is_none() => {
                if let Some(opened) = state.open_position(bar.close, bar.timestamp) {
                    debug!(
                        symbol,
                        price = bar.close,
                        quantity = opened.quantity,
                        "opened position"
                    );
                    position = Some(opened);
                }
            }
            SignalType::Sell => {
                if let Some(open) = position.take() {
                    let trade = state.close_position(open, bar.close, bar.timestamp);
                    debug!(
                        symbol,
                        price = bar.close,
                        profit_loss = trade.profit_loss,
                        "closed position"
                    );
                    trades.push(trade);
                }
            }
            _ => {}
        }

        let equity = state.equity(position.as_ref(), bar.close);
        let drawdown = state.update_drawdown(equity);
        equity_curve.push(EquityPoint {
            timestamp: bar.timestamp,
            equity,
            drawdown,
        });
    }

    // Force-close anything still open at the end of the data.
    if let Some(open) = position.take() {
        let last = &bars[bars.len() - 1];
        let trade = state.close_position(open, last.close, last.timestamp);
        debug!(
            symbol,
            price = last.close,
            profit_loss = trade.profit_loss,
            "force-closed open position at end of data"
        );
        trades.push(trade);
    }

    let final_capital = state.cash;
    let metrics = compute_metrics(
        initial_capital,
        final_capital,
        &trades,
        &equity_curve,
        start_date,
        end_date,
    );

    info!(
        strategy = strategy.name(),
        symbol,
        trades = trades.len(),
        final_capital,
        total_return_pct = metrics.total_return_pct,
        "backtest complete"
    );

    Ok(BacktestResult {
        run_id: Uuid::new_v4(),
        strategy_name: strategy.name().to_string(),
        symbol: symbol.to_string(),
        start_date,
        end_date,
        initial_capital,
        final_capital,
        metrics,
        trades,
        equity_curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{NewsSentimentStrategy, SentimentSource, Strategy};
    use crate::testing::{ascending, bars_from_closes};
    use crate::types::Signal;

    /// Emits a fixed signal per bar index (0-based); HOLD beyond the script.
    struct ScriptedStrategy {
        script: Vec<(usize, SignalType)>,
    }

    impl ScriptedStrategy {
        fn new(script: Vec<(usize, SignalType)>) -> Self {
            Self { script }
        }
    }

    impl Strategy for ScriptedStrategy {
        fn name(&self) -> &str {
            "scripted"
        }

        fn description(&self) -> &str {
            "test fixture"
        }

        fn min_bars(&self) -> usize {
            1
        }

        fn analyze(&self, symbol: &str, bars: &[Bar]) -> Signal {
            let index = bars.len() - 1;
            let signal_type = self
                .script
                .iter()
                .find(|(at, _)| *at == index)
                .map(|(_, s)| *s)
                .unwrap_or(SignalType::Hold);
            Signal::new(self.name(), symbol, signal_type, 0.9, "scripted")
        }
    }

    struct NoSource;

    impl SentimentSource for NoSource {
        fn latest(&self, _symbol: &str) -> Option<crate::strategies::SentimentSnapshot> {
            None
        }
    }

    fn dates(bars: &[Bar]) -> (DateTime<Utc>, DateTime<Utc>) {
        (bars[0].timestamp, bars[bars.len() - 1].timestamp)
    }

    #[test]
    fn buy_then_sell_produces_one_profitable_trade() {
        // Close is 100 at bar index 19 and 105 at index 20.
        let mut closes = vec![100.0; 20];
        closes.push(105.0);
        closes.extend([105.0; 4]);
        let bars = bars_from_closes(&closes);
        let (start, end) = dates(&bars);

        let strategy = ScriptedStrategy::new(vec![
            (19, SignalType::Buy),
            (20, SignalType::Sell),
        ]);
        let result = run_backtest(&strategy, "TEST", &bars, start, end, 100_000.0).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        // 95% of 100k at price 100: floor(95000 / 100) = 950 shares.
        assert_eq!(trade.quantity, 950);
        assert!((trade.profit_loss - 950.0 * 5.0).abs() < 1e-10);
        assert!(trade.profit_loss > 0.0);
        assert!((trade.profit_loss_pct - 5.0).abs() < 1e-10);
        assert_eq!(trade.holding_period_days, 1);
        assert!((result.final_capital - 104_750.0).abs() < 1e-10);
        assert_eq!(result.metrics.total_trades, 1);
        assert_eq!(result.metrics.winning_trades, 1);
    }

    #[test]
    fn warmup_skips_first_nineteen_bars() {
        let bars = ascending(50, 100.0, 1.0);
        let (start, end) = dates(&bars);
        let strategy = ScriptedStrategy::new(vec![]);
        let result = run_backtest(&strategy, "TEST", &bars, start, end, 100_000.0).unwrap();
        // Bars 0..18 are warm-up; 31 equity points remain.
        assert_eq!(result.equity_curve.len(), 31);
    }

    #[test]
    fn open_position_is_force_closed_at_end_of_data() {
        let bars = ascending(30, 100.0, 1.0);
        let (start, end) = dates(&bars);
        let strategy = ScriptedStrategy::new(vec![(19, SignalType::Buy)]);
        let result = run_backtest(&strategy, "TEST", &bars, start, end, 100_000.0).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.exit_date, bars[29].timestamp);
        assert!((trade.exit_price - bars[29].close).abs() < 1e-10);
        // Rising prices: the forced close realizes a gain.
        assert!(trade.profit_loss > 0.0);
    }

    #[test]
    fn sell_while_flat_and_buy_while_long_are_no_ops() {
        let bars = ascending(30, 100.0, 1.0);
        let (start, end) = dates(&bars);
        let strategy = ScriptedStrategy::new(vec![
            (19, SignalType::Sell), // flat: nothing to close
            (20, SignalType::Buy),
            (21, SignalType::Buy), // long: second buy ignored
            (22, SignalType::Sell),
        ]);
        let result = run_backtest(&strategy, "TEST", &bars, start, end, 100_000.0).unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].entry_date, bars[20].timestamp);
    }

    #[test]
    fn equity_dips_below_peak_register_as_drawdown() {
        let mut closes = vec![100.0; 20];
        closes.extend([110.0, 90.0, 95.0]);
        let bars = bars_from_closes(&closes);
        let (start, end) = dates(&bars);
        let strategy = ScriptedStrategy::new(vec![(19, SignalType::Buy)]);
        let result = run_backtest(&strategy, "TEST", &bars, start, end, 100_000.0).unwrap();

        let max_drawdown = result
            .equity_curve
            .iter()
            .map(|p| p.drawdown)
            .fold(0.0, f64::max);
        assert!(max_drawdown > 0.0);
        assert!((result.metrics.max_drawdown - max_drawdown).abs() < 1e-10);
        // Every drawdown is non-negative by construction.
        assert!(result.equity_curve.iter().all(|p| p.drawdown >= 0.0));
    }

    #[test]
    fn rejects_empty_history() {
        let strategy = ScriptedStrategy::new(vec![]);
        let err = run_backtest(
            &strategy,
            "TEST",
            &[],
            crate::testing::base_time(),
            crate::testing::base_time(),
            100_000.0,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::EmptyHistory(_)));
    }

    #[test]
    fn rejects_non_backtestable_strategy() {
        let strategy = NewsSentimentStrategy::new(Box::new(NoSource));
        let bars = ascending(30, 100.0, 1.0);
        let (start, end) = dates(&bars);
        let err = run_backtest(&strategy, "TEST", &bars, start, end, 100_000.0).unwrap_err();
        assert!(matches!(err, EngineError::NotBacktestable(_)));
    }

    #[test]
    fn rejects_non_positive_capital() {
        let strategy = ScriptedStrategy::new(vec![]);
        let bars = ascending(30, 100.0, 1.0);
        let (start, end) = dates(&bars);
        let err = run_backtest(&strategy, "TEST", &bars, start, end, 0.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCapital(_)));
    }

    #[test]
    fn tiny_capital_that_buys_no_shares_never_opens() {
        // 95% of 50 buys zero whole shares at price 100.
        let bars = ascending(30, 100.0, 1.0);
        let (start, end) = dates(&bars);
        let strategy = ScriptedStrategy::new(vec![(19, SignalType::Buy)]);
        let result = run_backtest(&strategy, "TEST", &bars, start, end, 50.0).unwrap();
        assert!(result.trades.is_empty());
        assert!((result.final_capital - 50.0).abs() < 1e-10);
    }
}
