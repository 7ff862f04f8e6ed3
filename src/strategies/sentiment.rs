// =============================================================================
// News Sentiment Strategy — externally-supplied signal producer
// =============================================================================
//
// Adapter for opaque AI/news signal producers: the engine sees the same
// Strategy interface as the technical variants, but the actual scoring comes
// from an injected `SentimentSource` collaborator. Because each call may hit
// a live external service, the strategy opts out of backtesting; the
// simulator refuses to run it.

use tracing::{debug, info};

use crate::strategies::{insufficient_data_signal, Strategy};
use crate::types::{Bar, Signal, SignalType};

/// Aggregated sentiment for one instrument, produced by a collaborator
/// (news feed, LLM, analyst pipeline). `score` is in [-1, 1], positive
/// meaning bullish.
#[derive(Debug, Clone)]
pub struct SentimentSnapshot {
    pub score: f64,
    pub headline_count: usize,
    pub summary: String,
}

/// External provider of sentiment snapshots. Implementations live outside
/// the engine; a `None` answer means no recent coverage.
pub trait SentimentSource: Send + Sync {
    fn latest(&self, symbol: &str) -> Option<SentimentSnapshot>;
}

/// Score past this magnitude picks a direction; anything closer to zero is
/// mixed coverage and stays a HOLD.
const DIRECTION_THRESHOLD: f64 = 0.25;

pub struct NewsSentimentStrategy {
    source: Box<dyn SentimentSource>,
}

impl NewsSentimentStrategy {
    pub fn new(source: Box<dyn SentimentSource>) -> Self {
        Self { source }
    }
}

impl Strategy for NewsSentimentStrategy {
    fn name(&self) -> &str {
        "news_sentiment"
    }

    fn description(&self) -> &str {
        "Sentiment analysis of recent news coverage via an external provider"
    }

    fn min_bars(&self) -> usize {
        // Only the current price context is needed.
        1
    }

    fn analyze(&self, symbol: &str, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_bars() {
            return insufficient_data_signal(self.name(), symbol, self.min_bars(), bars.len());
        }

        info!(symbol, "running news sentiment analysis");

        let snapshot = match self.source.latest(symbol) {
            Some(snapshot) => snapshot,
            None => {
                return Signal::new(
                    self.name(),
                    symbol,
                    SignalType::Hold,
                    0.3,
                    format!("No recent news found for {symbol}. Defaulting to HOLD."),
                );
            }
        };

        debug!(
            symbol,
            score = snapshot.score,
            headlines = snapshot.headline_count,
            "sentiment snapshot received"
        );

        let score = snapshot.score.clamp(-1.0, 1.0);
        let (signal_type, confidence) = if score > DIRECTION_THRESHOLD {
            (SignalType::Buy, score.abs().min(0.95))
        } else if score < -DIRECTION_THRESHOLD {
            (SignalType::Sell, score.abs().min(0.95))
        } else {
            (SignalType::Hold, 0.5)
        };

        Signal::new(
            self.name(),
            symbol,
            signal_type,
            confidence,
            format!(
                "News sentiment score {score:.2} across {} headlines: {}",
                snapshot.headline_count, snapshot.summary
            ),
        )
    }

    fn is_backtestable(&self) -> bool {
        // Live external calls per data point would be replayed hundreds of
        // times in a backtest.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flat;

    struct FixedSource(Option<SentimentSnapshot>);

    impl SentimentSource for FixedSource {
        fn latest(&self, _symbol: &str) -> Option<SentimentSnapshot> {
            self.0.clone()
        }
    }

    #[test]
    fn opts_out_of_backtesting() {
        let strategy = NewsSentimentStrategy::new(Box::new(FixedSource(None)));
        assert!(!strategy.is_backtestable());
        assert!(strategy.validate());
    }

    #[test]
    fn no_coverage_defaults_to_hold() {
        let strategy = NewsSentimentStrategy::new(Box::new(FixedSource(None)));
        let bars = flat(5, 100.0);
        let signal = strategy.analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert!((signal.confidence - 0.3).abs() < 1e-10);
        assert!(signal.reasoning.contains("No recent news"));
    }

    #[test]
    fn bullish_score_buys_with_score_confidence() {
        let strategy = NewsSentimentStrategy::new(Box::new(FixedSource(Some(SentimentSnapshot {
            score: 0.8,
            headline_count: 6,
            summary: "Strong quarterly results".to_string(),
        }))));
        let bars = flat(5, 100.0);
        let signal = strategy.analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Buy);
        assert!((signal.confidence - 0.8).abs() < 1e-10);
        assert!(signal.reasoning.contains("6 headlines"));
    }

    #[test]
    fn bearish_score_sells() {
        let strategy = NewsSentimentStrategy::new(Box::new(FixedSource(Some(SentimentSnapshot {
            score: -0.6,
            headline_count: 3,
            summary: "Regulatory probe announced".to_string(),
        }))));
        let bars = flat(5, 100.0);
        let signal = strategy.analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Sell);
        assert!((signal.confidence - 0.6).abs() < 1e-10);
    }

    #[test]
    fn mixed_score_holds() {
        let strategy = NewsSentimentStrategy::new(Box::new(FixedSource(Some(SentimentSnapshot {
            score: 0.1,
            headline_count: 4,
            summary: "Mixed coverage".to_string(),
        }))));
        let bars = flat(5, 100.0);
        let signal = strategy.analyze("INFY", &bars);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert!((signal.confidence - 0.5).abs() < 1e-10);
    }

    #[test]
    fn empty_history_is_insufficient() {
        let strategy = NewsSentimentStrategy::new(Box::new(FixedSource(None)));
        let signal = strategy.analyze("INFY", &[]);
        assert_eq!(signal.signal_type, SignalType::Hold);
        assert_eq!(signal.confidence, 0.0);
    }
}
