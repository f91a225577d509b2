//! Stake sizing.
//!
//! Scales the stake with the edge and inversely with the payout multiple,
//! so a long-odds bet needs less money to realise the same absolute EV.

use rust_decimal::prelude::*;
use tracing::debug;

use super::ev::PricedOutcome;
use crate::types::Recommendation;

/// Recommended stake: `floor(capital * ev / payout)`, or zero without an edge.
///
/// Zero is also returned for a non-positive payout or capital. Stakes too
/// large for `u64` (or for `Decimal` arithmetic) saturate at `u64::MAX`.
pub fn recommend(capital: Decimal, ev: f64, payout: f64) -> u64 {
    if ev <= 0.0 || payout <= 0.0 || capital <= Decimal::ZERO {
        return 0;
    }
    let (Some(ev), Some(payout)) = (Decimal::from_f64(ev), Decimal::from_f64(payout)) else {
        return 0;
    };
    capital
        .checked_mul(ev)
        .and_then(|edge| edge.checked_div(payout))
        .and_then(|stake| stake.floor().to_u64())
        .unwrap_or(u64::MAX)
}

/// Sizes priced outcomes against a capital and ranks them.
#[derive(Debug, Clone, Default)]
pub struct WagerSizer;

impl WagerSizer {
    pub fn new() -> Self {
        Self
    }

    /// Size every outcome, then sort descending by amount.
    ///
    /// The sort is stable, so equal amounts keep declaration order.
    pub fn size(&self, capital: Decimal, priced: &[PricedOutcome]) -> Vec<Recommendation> {
        let mut recs: Vec<Recommendation> = priced
            .iter()
            .map(|p| {
                let amount = recommend(capital, p.ev, p.payout);
                if amount > 0 {
                    debug!(
                        outcome = %p.outcome,
                        ev = format!("{:+.4}", p.ev),
                        amount,
                        "Stake sized"
                    );
                }
                Recommendation {
                    outcome: p.outcome,
                    label: p.outcome.label().to_string(),
                    probability: p.probability,
                    ev: p.ev,
                    payout: p.payout,
                    amount,
                }
            })
            .collect();

        recs.sort_by(|a, b| b.amount.cmp(&a.amount));
        recs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
