//! Expected value per wager.
//!
//! Combines outcome probabilities with the payout table. The banker
//! payout is reduced by the commission rate; every other payout is flat.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::probability::Probabilities;
use crate::types::BetOutcome;

// ---------------------------------------------------------------------------
// Payout table
// ---------------------------------------------------------------------------

/// Net units paid per unit staked on a win (original stake excluded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutTable {
    /// Banker payout before commission.
    pub banker: f64,
    pub player: f64,
    pub tie: f64,
    pub banker_pair: f64,
    pub player_pair: f64,
    pub super6: f64,
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            banker: 0.95,
            player: 1.0,
            tie: 8.0,
            banker_pair: 11.0,
            player_pair: 11.0,
            super6: 12.0,
        }
    }
}

impl PayoutTable {
    /// Payout for `outcome` once `commission_rate` (a fraction) is applied.
    pub fn payout(&self, outcome: BetOutcome, commission_rate: f64) -> f64 {
        match outcome {
            BetOutcome::Banker => self.banker - commission_rate,
            BetOutcome::Player => self.player,
            BetOutcome::Tie => self.tie,
            BetOutcome::BankerPair => self.banker_pair,
            BetOutcome::PlayerPair => self.player_pair,
            BetOutcome::Super6 => self.super6,
        }
    }
}

// ---------------------------------------------------------------------------
// EV
// ---------------------------------------------------------------------------

/// `p * payout - (1 - p)`: a win pays `payout`, a loss forfeits the stake.
pub fn expected_value(probability: f64, payout: f64) -> f64 {
    probability * payout - (1.0 - probability)
}

/// A wager with its probability, payout and EV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedOutcome {
    pub outcome: BetOutcome,
    pub probability: f64,
    pub payout: f64,
    pub ev: f64,
}

/// Prices all six outcomes against a payout table.
#[derive(Debug, Clone, Default)]
pub struct EvEngine {
    payouts: PayoutTable,
}

impl EvEngine {
    pub fn new(payouts: PayoutTable) -> Self {
        Self { payouts }
    }

    /// Price every outcome, in declaration order.
    pub fn evaluate(&self, probs: &Probabilities, commission_rate: f64) -> Vec<PricedOutcome> {
        BetOutcome::ALL
            .iter()
            .map(|&outcome| {
                let probability = probs.of(outcome);
                let payout = self.payouts.payout(outcome, commission_rate);
                let ev = expected_value(probability, payout);
                debug!(
                    outcome = %outcome,
                    probability = format!("{:.4}", probability),
                    payout,
                    ev = format!("{:+.4}", ev),
                    "Outcome priced"
                );
                PricedOutcome {
                    outcome,
                    probability,
                    payout,
                    ev,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
