// =============================================================================
// Trading Engine — registry and facade over the quantitative core
// =============================================================================
//
// The registry owns one instance per strategy, built once from the immutable
// engine configuration. The engine wires a bar source (the history
// collaborator) to the three entry points exposed to callers:
// `execute_strategy`, `execute_consensus` and `run_backtest`.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::backtest::{self, BacktestResult};
use crate::config::EngineConfig;
use crate::consensus::{self, ConsensusReport};
use crate::error::EngineError;
use crate::strategies::{
    BollingerBandsStrategy, MaCrossoverStrategy, MacdStrategy, RsiStrategy, StochasticStrategy,
    Strategy, SupportResistanceStrategy, VolumeBreakoutStrategy,
};
use crate::types::{Bar, Signal};

/// Ordered, deduplicated bar history for one instrument. Supplied by
/// persistence/broker collaborators; read-only to the engine.
pub trait BarSource: Send + Sync {
    fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, EngineError>;
}

/// Name-keyed collection of strategy instances.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registry holding the seven technical strategies, parameterized from
    /// the engine configuration. External signal producers (AI/news) are
    /// registered separately by the caller that owns their collaborators.
    pub fn technical_suite(config: &EngineConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RsiStrategy::new(config.rsi.clone())));
        registry.register(Box::new(MacdStrategy::new(config.macd.clone())));
        registry.register(Box::new(BollingerBandsStrategy::new(config.bollinger.clone())));
        registry.register(Box::new(MaCrossoverStrategy::new(config.ma_crossover.clone())));
        registry.register(Box::new(StochasticStrategy::new(config.stochastic.clone())));
        registry.register(Box::new(VolumeBreakoutStrategy::new(
            config.volume_breakout.clone(),
        )));
        registry.register(Box::new(SupportResistanceStrategy::new(
            config.support_resistance.clone(),
        )));
        registry
    }

    /// Add a strategy. Lookups take the first match, so names must be unique.
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    pub fn get(&self, name: &str) -> Result<&dyn Strategy, EngineError> {
        self.strategies
            .iter()
            .map(|s| s.as_ref())
            .find(|s| s.name() == name)
            .ok_or_else(|| EngineError::UnknownStrategy(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Names of strategies the simulator will accept.
    pub fn backtestable_names(&self) -> Vec<&str> {
        self.strategies
            .iter()
            .filter(|s| s.is_backtestable())
            .map(|s| s.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Facade exposed to the (out-of-scope) transport layers.
pub struct TradingEngine<D: BarSource> {
    registry: StrategyRegistry,
    bars: D,
}

impl<D: BarSource> TradingEngine<D> {
    pub fn new(registry: StrategyRegistry, bars: D) -> Self {
        Self { registry, bars }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Run one strategy over caller-supplied bars and return its signal.
    pub fn execute_strategy(
        &self,
        strategy_name: &str,
        symbol: &str,
        bars: &[Bar],
    ) -> Result<Signal, EngineError> {
        let strategy = self.registry.get(strategy_name)?;
        if !strategy.validate() {
            return Err(EngineError::ValidationFailed(strategy_name.to_string()));
        }

        let signal = strategy.analyze(symbol, bars);
        info!(
            strategy = strategy_name,
            symbol,
            signal = %signal.signal_type,
            confidence = signal.confidence,
            "strategy executed"
        );
        Ok(signal)
    }

    /// Fan the same bars out to several strategies and reduce their signals
    /// to a majority vote. Fails on the first unknown strategy name.
    pub fn execute_consensus(
        &self,
        strategy_names: &[&str],
        symbol: &str,
        bars: &[Bar],
    ) -> Result<ConsensusReport, EngineError> {
        let mut signals = Vec::with_capacity(strategy_names.len());
        for name in strategy_names {
            signals.push(self.execute_strategy(name, symbol, bars)?);
        }
        Ok(consensus::aggregate(symbol, signals))
    }

    /// Fetch history from the bar source and replay the named strategy.
    pub fn run_backtest(
        &self,
        strategy_name: &str,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        initial_capital: f64,
    ) -> Result<BacktestResult, EngineError> {
        info!(
            strategy = strategy_name,
            symbol,
            %start,
            %end,
            "running backtest"
        );

        let strategy = self.registry.get(strategy_name)?;
        if !strategy.is_backtestable() {
            return Err(EngineError::NotBacktestable(strategy_name.to_string()));
        }

        let bars = self.bars.history(symbol, start, end)?;
        if bars.is_empty() {
            return Err(EngineError::EmptyHistory(symbol.to_string()));
        }

        backtest::run_backtest(strategy, symbol, &bars, start, end, initial_capital)
    }
}
