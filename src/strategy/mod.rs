//! Strategy engine — probability estimation, EV pricing, and stake sizing.

pub mod ev;
pub mod probability;
pub mod sizing;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shoe::ShoeState;
use crate::types::Recommendation;
use ev::{EvEngine, PayoutTable};
use probability::Probabilities;
use sizing::WagerSizer;

// ---------------------------------------------------------------------------
// Advice
// ---------------------------------------------------------------------------

/// Result of one pipeline pass over a shoe snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub probabilities: Probabilities,
    /// Ranked descending by amount.
    pub recommendations: Vec<Recommendation>,
    pub remaining: u32,
}

impl Advice {
    /// Highest-stake recommendation, if any stake is non-zero.
    pub fn best(&self) -> Option<&Recommendation> {
        self.recommendations.first().filter(|r| r.amount > 0)
    }
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

/// Pipelines probability estimation → EV pricing → stake sizing.
///
/// Stateless apart from the payout table; the session calls `advise`
/// after every shoe mutation or settings change.
#[derive(Debug, Clone, Default)]
pub struct Advisor {
    ev: EvEngine,
    sizer: WagerSizer,
}

impl Advisor {
    pub fn new(payouts: PayoutTable) -> Self {
        Self {
            ev: EvEngine::new(payouts),
            sizer: WagerSizer::new(),
        }
    }

    /// Run the full pipeline. `None` when the shoe is exhausted.
    pub fn advise(&self, shoe: &ShoeState, capital: Decimal, commission_rate: f64) -> Option<Advice> {
        let probabilities = probability::estimate(shoe)?;
        let priced = self.ev.evaluate(&probabilities, commission_rate);
        let recommendations = self.sizer.size(capital, &priced);

        debug!(
            remaining = shoe.total(),
            positive = recommendations.iter().filter(|r| r.amount > 0).count(),
            "Advice computed"
        );

        Some(Advice {
            probabilities,
            recommendations,
            remaining: shoe.total(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
