// =============================================================================
// Performance Metrics Calculator
// =============================================================================
//
// Pure function of (initial capital, final capital, trades, equity curve,
// date range). Percentage fields round the underlying fraction to 4 decimal
// places half-up and then scale by 100; ratios round to 2 places. Zero
// variance, zero losses and zero trades are defined outcomes, never errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EquityPoint, Trade};

/// Annualization factor: trading days per year.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Derived statistics for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub days_in_market: i64,
}

/// Decimal rounding with ties away from zero (half-up).
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    };
    rounded / factor
}

/// Compute the full metrics record for a completed run.
pub fn compute_metrics(
    initial_capital: f64,
    final_capital: f64,
    trades: &[Trade],
    equity_curve: &[EquityPoint],
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> PerformanceMetrics {
    let total_return = final_capital - initial_capital;
    let total_return_pct = round_half_up(total_return / initial_capital, 4) * 100.0;

    let total_trades = trades.len();
    let winning_trades = trades.iter().filter(|t| t.profit_loss > 0.0).count();
    let losing_trades = total_trades - winning_trades;

    let win_rate = if total_trades > 0 {
        round_half_up(winning_trades as f64 / total_trades as f64, 4) * 100.0
    } else {
        0.0
    };

    let total_wins: f64 = trades
        .iter()
        .filter(|t| t.profit_loss > 0.0)
        .map(|t| t.profit_loss)
        .sum();
    let total_losses: f64 = trades
        .iter()
        .filter(|t| t.profit_loss < 0.0)
        .map(|t| t.profit_loss.abs())
        .sum();

    // Denominators floor at 1 so empty categories average to 0.
    let average_win = round_half_up(total_wins / winning_trades.max(1) as f64, 2);
    let loss_sum: f64 = trades
        .iter()
        .filter(|t| t.profit_loss < 0.0)
        .map(|t| t.profit_loss)
        .sum();
    let average_loss = round_half_up(loss_sum / losing_trades.max(1) as f64, 2);

    let largest_win = trades
        .iter()
        .map(|t| t.profit_loss)
        .fold(f64::NEG_INFINITY, f64::max);
    let largest_win = if largest_win.is_finite() { largest_win } else { 0.0 };
    let largest_loss = trades
        .iter()
        .map(|t| t.profit_loss)
        .fold(f64::INFINITY, f64::min);
    let largest_loss = if largest_loss.is_finite() { largest_loss } else { 0.0 };

    let profit_factor = if total_losses > 0.0 {
        round_half_up(total_wins / total_losses, 2)
    } else {
        0.0
    };

    let max_drawdown = equity_curve
        .iter()
        .map(|p| p.drawdown)
        .fold(0.0, f64::max);
    let max_drawdown_pct = round_half_up(max_drawdown / initial_capital, 4) * 100.0;

    PerformanceMetrics {
        total_return,
        total_return_pct,
        sharpe_ratio: sharpe_ratio(trades),
        sortino_ratio: sortino_ratio(trades),
        max_drawdown,
        max_drawdown_pct,
        total_trades,
        winning_trades,
        losing_trades,
        win_rate,
        profit_factor,
        average_win,
        average_loss,
        largest_win,
        largest_loss,
        days_in_market: (end_date - start_date).num_days(),
    }
}

/// Annualized Sharpe ratio over per-trade return percentages, using the
/// sample standard deviation. Zero when there are no trades or no variance.
fn sharpe_ratio(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }

    let returns: Vec<f64> = trades.iter().map(|t| t.profit_loss_pct).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;

    let std_dev = if returns.len() > 1 {
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    } else {
        0.0
    };

    if std_dev == 0.0 {
        return 0.0;
    }

    round_half_up((mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt(), 2)
}

/// Annualized Sortino ratio: same numerator, but the denominator is the
/// root-mean-square of only the negative per-trade returns. Zero when there
/// are no trades, no losing trades, or no downside deviation.
fn sortino_ratio(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }

    let returns: Vec<f64> = trades.iter().map(|t| t.profit_loss_pct).collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;

    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if negatives.is_empty() {
        return 0.0;
    }

    let downside_deviation =
        (negatives.iter().map(|r| r * r).sum::<f64>() / negatives.len() as f64).sqrt();
    if downside_deviation == 0.0 {
        return 0.0;
    }

    round_half_up((mean / downside_deviation) * TRADING_DAYS_PER_YEAR.sqrt(), 2)
}
