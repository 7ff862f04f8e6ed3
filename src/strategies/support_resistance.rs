// =============================================================================
// Support & Resistance Strategy
// =============================================================================
//
// Swing highs/lows over the lookback window (symmetric 2-bar neighborhoods,
// bounded by available history) become candidate levels; levels within 2% of
// each other merge into one. Buy on a bounce off the nearest support, sell on
// an approach to the nearest resistance; confidence grows with historical
// touches and proximity to the level.

use tracing::debug;

use crate::config::SupportResistanceParams;
use crate::strategies::{insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

/// Levels closer than this fraction of each other merge into one.
const MERGE_TOLERANCE: f64 = 0.02;

pub struct SupportResistanceStrategy {
    params: SupportResistanceParams,
}

impl SupportResistanceStrategy {
    pub fn new(params: SupportResistanceParams) -> Self {
        Self { params }
    }

    fn evaluate(&self, symbol: &str, bars: &[Bar]) -> Signal {
        let len = bars.len();
        let price = bars[len - 1].close;

        let supports = self.find_levels(bars, |b| b.low, |candidate, other| candidate < other);
        let resistances = self.find_levels(bars, |b| b.high, |candidate, other| candidate > other);

        debug!(
            symbol,
            price,
            supports = supports.len(),
            resistances = resistances.len(),
            "support/resistance levels"
        );

        let nearest_support = nearest_level(price, &supports, true);
        let nearest_resistance = nearest_level(price, &resistances, false);

        // Bounce off support?
        if let Some(support) = nearest_support.filter(|&level| self.is_near(price, level)) {
            let bouncing = price > bars[len - 2].close;
            if bouncing {
                let touches = self.count_touches(bars, support);
                let confidence = self.level_confidence(price, support, touches);
                let mut signal = Signal::new(
                    self.name(),
                    symbol,
                    SignalType::Buy,
                    confidence,
                    format!(
                        "Price {price:.2} bouncing off support at {support:.2} ({touches} historical touches)"
                    ),
                )
                .with_stop(support * 0.98);
                if let Some(resistance) = nearest_resistance {
                    signal = signal.with_target(resistance * 0.99);
                }
                return signal;
            }
            return Signal::new(
                self.name(),
                symbol,
                SignalType::Hold,
                0.6,
                format!(
                    "Price {price:.2} testing support at {support:.2}. Waiting for bounce confirmation."
                ),
            );
        }

        // Rejection at resistance?
        if let Some(resistance) = nearest_resistance.filter(|&level| self.is_near(price, level)) {
            let touches = self.count_touches(bars, resistance);
            let confidence = self.level_confidence(price, resistance, touches);
            let mut signal = Signal::new(
                self.name(),
                symbol,
                SignalType::Sell,
                confidence,
                format!(
                    "Price {price:.2} approaching resistance at {resistance:.2} ({touches} historical touches)"
                ),
            )
            .with_stop(resistance * 1.02);
            if let Some(support) = nearest_support {
                signal = signal.with_target(support * 1.01);
            }
            return signal;
        }

        let support_info = match nearest_support {
            Some(level) => format!("support {level:.2}"),
            None => "no nearby support".to_string(),
        };
        let resistance_info = match nearest_resistance {
            Some(level) => format!("resistance {level:.2}"),
            None => "no nearby resistance".to_string(),
        };
        Signal::new(
            self.name(),
            symbol,
            SignalType::Hold,
            0.5,
            format!(
                "Price {price:.2} between levels ({support_info}, {resistance_info}). Waiting for a key level."
            ),
        )
    }

    /// Swing-point scan over the lookback window. A bar is a swing point when
    /// `extremum(bar)` beats the same extremum of both neighbors on each
    /// side; the most recent two bars have no right-hand neighborhood and are
    /// never candidates.
    fn find_levels(
        &self,
        bars: &[Bar],
        extremum: impl Fn(&Bar) -> f64,
        beats: impl Fn(f64, f64) -> bool,
    ) -> Vec<f64> {
        let len = bars.len();
        let start = len.saturating_sub(self.params.lookback_period).max(2);

        let mut levels = Vec::new();
        for i in start..len.saturating_sub(2) {
            let candidate = extremum(&bars[i]);
            if beats(candidate, extremum(&bars[i - 1]))
                && beats(candidate, extremum(&bars[i - 2]))
                && beats(candidate, extremum(&bars[i + 1]))
                && beats(candidate, extremum(&bars[i + 2]))
            {
                levels.push(candidate);
            }
        }

        self.consolidate(levels)
    }

    /// Merge nearby swing points into single levels (running mean weighted by
    /// cluster size); keep clusters with at least `min_touches` points.
    fn consolidate(&self, mut levels: Vec<f64>) -> Vec<f64> {
        if levels.is_empty() {
            return levels;
        }
        levels.sort_by(f64::total_cmp);

        let mut consolidated = Vec::new();
        let mut current = levels[0];
        let mut count = 1usize;

        for &level in &levels[1..] {
            if ((level - current) / current).abs() < MERGE_TOLERANCE {
                current = (current * count as f64 + level) / (count as f64 + 1.0);
                count += 1;
            } else {
                if count >= self.params.min_touches {
                    consolidated.push(current);
                }
                current = level;
                count = 1;
            }
        }
        if count >= self.params.min_touches {
            consolidated.push(current);
        }

        consolidated
    }

    fn is_near(&self, price: f64, level: f64) -> bool {
        ((price - level) / level).abs() * 100.0 <= self.params.bounce_threshold_pct
    }

    /// How often the last lookback window traded against this level.
    fn count_touches(&self, bars: &[Bar], level: f64) -> usize {
        let window = &bars[bars.len().saturating_sub(self.params.lookback_period)..];
        window
            .iter()
            .filter(|b| self.is_near(b.low, level) || self.is_near(b.high, level))
            .count()
    }

    /// Base 0.65 plus a touch-count bonus (up to 0.20) and a proximity bonus
    /// (up to 0.10), capped at 0.90.
    fn level_confidence(&self, price: f64, level: f64, touches: usize) -> f64 {
        let touch_bonus = (touches as f64 * 0.05).min(0.20);
        let pct_diff = ((price - level) / level).abs() * 100.0;
        let proximity_bonus =
            (0.10 * (1.0 - pct_diff / self.params.bounce_threshold_pct)).clamp(0.0, 0.10);
        (0.65 + touch_bonus + proximity_bonus).min(0.90)
    }
}

/// Nearest level to `price`. Supports are filtered to levels at or below the
/// price, resistances to levels at or above it; of those, the closest by
/// absolute distance wins.
fn nearest_level(price: f64, levels: &[f64], is_support: bool) -> Option<f64> {
    levels
        .iter()
        .copied()
        .filter(|&level| if is_support { level <= price } else { level >= price })
        .min_by(|a, b| (price - a).abs().total_cmp(&(price - b).abs()))
}

impl Strategy for SupportResistanceStrategy {
    fn name(&self) -> &str {
        "support_resistance"
    }

    fn description(&self) -> &str {
        "Trades key support and resistance levels derived from price action"
    }

    fn min_bars(&self) -> usize {
        self.params.lookback_period + 10
    }

    fn analyze(&self, symbol: &str, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_bars() {
            return insufficient_data_signal(self.name(), symbol, self.min_bars(), bars.len());
        }
        self.evaluate(symbol, bars)
    }
}
