// =============================================================================
// Vega Quant Engine — Demo Entry Point
// =============================================================================
//
// Drives the engine end-to-end against a deterministic synthetic bar feed:
// consensus across the technical suite for each configured symbol, then one
// backtest per backtestable strategy. No transport layer lives here; the
// binary exists to exercise the engine and log what it produces.
// =============================================================================

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vega_engine::engine::{BarSource, StrategyRegistry, TradingEngine};
use vega_engine::error::EngineError;
use vega_engine::types::Bar;
use vega_engine::EngineConfig;

/// Deterministic synthetic feed: a gentle trend with an oscillation and
/// periodic volume spikes, seeded from the symbol name. No RNG, so demo runs
/// are reproducible.
struct DemoBarSource;

impl BarSource for DemoBarSource {
    fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, EngineError> {
        let days = (end - start).num_days().max(0) as usize;
        let seed = symbol.bytes().map(u64::from).sum::<u64>();
        let base_price = 80.0 + (seed % 200) as f64;
        let phase = (seed % 7) as f64;

        let mut bars = Vec::with_capacity(days);
        let mut prev_close = base_price;
        for i in 0..days {
            let x = i as f64;
            let close = base_price + x * 0.35 + ((x * 0.45) + phase).sin() * 6.0;
            let open = if i == 0 { close } else { prev_close };
            let high = close.max(open) + 1.2;
            let low = close.min(open) - 1.4;
            let volume = 900_000
                + ((i as u64 * 37 + seed) % 11) * 120_000
                + if i % 13 == 0 { 1_500_000 } else { 0 };

            bars.push(Bar {
                timestamp: start + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume,
            });
            prev_close = close;
        }

        Ok(bars)
    }
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Vega Quant Engine starting");

    let mut config = EngineConfig::load("engine_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        EngineConfig::default()
    });

    // Override symbols from env if available.
    if let Ok(symbols) = std::env::var("VEGA_SYMBOLS") {
        config.symbols = symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if config.symbols.is_empty() {
        config.symbols = vec![
            "RELIANCE".to_string(),
            "HDFCBANK".to_string(),
            "INFY".to_string(),
        ];
    }
    info!(symbols = ?config.symbols, "configured symbols");

    let registry = StrategyRegistry::technical_suite(&config);
    let strategy_names: Vec<String> =
        registry.names().iter().map(|s| s.to_string()).collect();
    let engine = TradingEngine::new(registry, DemoBarSource);

    let end = Utc::now();
    let start = end - Duration::days(365);

    for symbol in &config.symbols {
        let bars = DemoBarSource.history(symbol, start, end)?;

        // Live consensus over the most recent data.
        let names: Vec<&str> = strategy_names.iter().map(String::as_str).collect();
        let report = engine.execute_consensus(&names, symbol, &bars)?;
        info!(
            symbol = %symbol,
            consensus = %report.consensus,
            buy = report.buy_votes,
            sell = report.sell_votes,
            hold = report.hold_votes,
            "consensus"
        );
        for signal in &report.signals {
            info!(
                strategy = %signal.strategy,
                signal = %signal.signal_type,
                confidence = format!("{:.2}", signal.confidence),
                reasoning = %signal.reasoning,
                "per-strategy signal"
            );
        }

        // One backtest per backtestable strategy.
        for name in engine.registry().backtestable_names() {
            match engine.run_backtest(name, symbol, start, end, config.initial_capital) {
                Ok(result) => info!(
                    symbol = %symbol,
                    strategy = name,
                    trades = result.metrics.total_trades,
                    return_pct = result.metrics.total_return_pct,
                    sharpe = result.metrics.sharpe_ratio,
                    max_drawdown_pct = result.metrics.max_drawdown_pct,
                    win_rate = result.metrics.win_rate,
                    "backtest summary"
                ),
                Err(err) => warn!(symbol = %symbol, strategy = name, error = %err, "backtest failed"),
            }
        }
    }

    Ok(())
}
