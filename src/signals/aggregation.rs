//! Majority-vote aggregation of indicator votes

use crate::models::signal::{IndicatorVote, SignalDirection};

/// Deterministic direction and confidence before any language-model input.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseSignal {
    pub direction: SignalDirection,
    pub confidence: f64,
    pub votes: Vec<IndicatorVote>,
}

pub struct Aggregator;

impl Aggregator {
    /// Combine votes by strict plurality.
    ///
    /// BUY or SELL wins only with more votes than each other option; its confidence is
    /// the share of votes it received. Everything else is HOLD, with the share of
    /// neutral votes as confidence. No votes at all reads HOLD at 0.0.
    pub fn majority(votes: Vec<IndicatorVote>) -> BaseSignal {
        let total = votes.len();
        if total == 0 {
            return BaseSignal {
                direction: SignalDirection::Hold,
                confidence: 0.0,
                votes,
            };
        }

        let count = |direction: SignalDirection| {
            votes.iter().filter(|v| v.direction == direction).count()
        };
        let buy = count(SignalDirection::Buy);
        let sell = count(SignalDirection::Sell);
        let hold = count(SignalDirection::Hold);

        let (direction, agreeing) = if buy > sell && buy > hold {
            (SignalDirection::Buy, buy)
        } else if sell > buy && sell > hold {
            (SignalDirection::Sell, sell)
        } else {
            (SignalDirection::Hold, hold)
        };

        BaseSignal {
            direction,
            confidence: agreeing as f64 / total as f64,
            votes,
        }
    }
}
