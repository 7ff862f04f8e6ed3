// =============================================================================
// Engine Configuration
// =============================================================================
//
// Every tunable strategy parameter lives here as an immutable configuration
// struct, constructed once when the registry is built. All fields carry
// serde defaults so that older JSON files missing new fields still load.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec![
        "RELIANCE".to_string(),
        "HDFCBANK".to_string(),
        "INFY".to_string(),
    ]
}

fn default_initial_capital() -> f64 {
    100_000.0
}

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_oversold() -> f64 {
    // Widened from the textbook 30 for large-cap symbols.
    40.0
}

fn default_rsi_overbought() -> f64 {
    // Widened from the textbook 70 for large-cap symbols.
    60.0
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_period() -> usize {
    20
}

fn default_std_dev_multiplier() -> f64 {
    2.0
}

fn default_touch_threshold_pct() -> f64 {
    2.0
}

fn default_squeeze_width_pct() -> f64 {
    10.0
}

fn default_short_period() -> usize {
    10
}

fn default_long_period() -> usize {
    20
}

fn default_stochastic_k_period() -> usize {
    14
}

fn default_stochastic_d_period() -> usize {
    3
}

fn default_stochastic_oversold() -> f64 {
    25.0
}

fn default_stochastic_overbought() -> f64 {
    75.0
}

fn default_volume_period() -> usize {
    20
}

fn default_volume_multiplier() -> f64 {
    1.5
}

fn default_price_change_threshold_pct() -> f64 {
    1.0
}

fn default_strong_breakout_pct() -> f64 {
    2.5
}

fn default_lookback_period() -> usize {
    20
}

fn default_bounce_threshold_pct() -> f64 {
    1.5
}

fn default_min_touches() -> usize {
    1
}

// =============================================================================
// Per-strategy parameter structs
// =============================================================================

/// RSI thresholds and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiParams {
    #[serde(default = "default_rsi_period")]
    pub period: usize,
    #[serde(default = "default_rsi_oversold")]
    pub oversold: f64,
    #[serde(default = "default_rsi_overbought")]
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: default_rsi_period(),
            oversold: default_rsi_oversold(),
            overbought: default_rsi_overbought(),
        }
    }
}

/// MACD fast/slow/signal periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "default_macd_fast")]
    pub fast: usize,
    #[serde(default = "default_macd_slow")]
    pub slow: usize,
    #[serde(default = "default_macd_signal")]
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: default_macd_fast(),
            slow: default_macd_slow(),
            signal: default_macd_signal(),
        }
    }
}

/// Bollinger Band period, multiplier and touch/squeeze thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerParams {
    #[serde(default = "default_bollinger_period")]
    pub period: usize,
    #[serde(default = "default_std_dev_multiplier")]
    pub std_dev_multiplier: f64,
    /// Percent distance from a band that still counts as "touching" it.
    #[serde(default = "default_touch_threshold_pct")]
    pub touch_threshold_pct: f64,
    /// Band width (as a percent of the middle band) below which the market
    /// is treated as a squeeze.
    #[serde(default = "default_squeeze_width_pct")]
    pub squeeze_width_pct: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: default_bollinger_period(),
            std_dev_multiplier: default_std_dev_multiplier(),
            touch_threshold_pct: default_touch_threshold_pct(),
            squeeze_width_pct: default_squeeze_width_pct(),
        }
    }
}

/// Moving-average crossover periods; SMA by default, EMA when `use_ema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaCrossoverParams {
    #[serde(default = "default_short_period")]
    pub short_period: usize,
    #[serde(default = "default_long_period")]
    pub long_period: usize,
    #[serde(default)]
    pub use_ema: bool,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self {
            short_period: default_short_period(),
            long_period: default_long_period(),
            use_ema: false,
        }
    }
}

/// Stochastic oscillator periods and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StochasticParams {
    #[serde(default = "default_stochastic_k_period")]
    pub k_period: usize,
    #[serde(default = "default_stochastic_d_period")]
    pub d_period: usize,
    #[serde(default = "default_stochastic_oversold")]
    pub oversold: f64,
    #[serde(default = "default_stochastic_overbought")]
    pub overbought: f64,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: default_stochastic_k_period(),
            d_period: default_stochastic_d_period(),
            oversold: default_stochastic_oversold(),
            overbought: default_stochastic_overbought(),
        }
    }
}

/// Volume breakout thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeBreakoutParams {
    #[serde(default = "default_volume_period")]
    pub volume_period: usize,
    /// Volume must exceed this multiple of the trailing average.
    #[serde(default = "default_volume_multiplier")]
    pub volume_multiplier: f64,
    /// Minimum absolute close-to-close change, in percent.
    #[serde(default = "default_price_change_threshold_pct")]
    pub price_change_threshold_pct: f64,
    /// Absolute change, in percent, that upgrades a breakout to "strong".
    #[serde(default = "default_strong_breakout_pct")]
    pub strong_breakout_pct: f64,
}

impl Default for VolumeBreakoutParams {
    fn default() -> Self {
        Self {
            volume_period: default_volume_period(),
            volume_multiplier: default_volume_multiplier(),
            price_change_threshold_pct: default_price_change_threshold_pct(),
            strong_breakout_pct: default_strong_breakout_pct(),
        }
    }
}

/// Support/Resistance lookback and level thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportResistanceParams {
    #[serde(default = "default_lookback_period")]
    pub lookback_period: usize,
    /// Percent proximity to a level that counts as a touch/bounce.
    #[serde(default = "default_bounce_threshold_pct")]
    pub bounce_threshold_pct: f64,
    /// Minimum swing points that must agree before a level is kept.
    #[serde(default = "default_min_touches")]
    pub min_touches: usize,
}

impl Default for SupportResistanceParams {
    fn default() -> Self {
        Self {
            lookback_period: default_lookback_period(),
            bounce_threshold_pct: default_bounce_threshold_pct(),
            min_touches: default_min_touches(),
        }
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Top-level engine configuration.
///
/// Every field has a serde default so that older JSON files missing new
/// fields still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Symbols the demo runner analyses.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Capital handed to each demo backtest.
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    #[serde(default)]
    pub rsi: RsiParams,
    #[serde(default)]
    pub macd: MacdParams,
    #[serde(default)]
    pub bollinger: BollingerParams,
    #[serde(default)]
    pub ma_crossover: MaCrossoverParams,
    #[serde(default)]
    pub stochastic: StochasticParams,
    #[serde(default)]
    pub volume_breakout: VolumeBreakoutParams,
    #[serde(default)]
    pub support_resistance: SupportResistanceParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            initial_capital: default_initial_capital(),
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
            ma_crossover: MaCrossoverParams::default(),
            stochastic: StochasticParams::default(),
            volume_breakout: VolumeBreakoutParams::default(),
            support_resistance: SupportResistanceParams::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise engine config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }
}
