//! Win-probability estimation from the remaining shoe composition.
//!
//! A linear heuristic over low/mid/high rank buckets, not a full
//! combinatorial enumeration. Pair and Super 6 probabilities are fixed
//! constants independent of the shoe.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shoe::ShoeState;
use crate::types::BetOutcome;

/// Banker win probability with a neutral shoe.
pub const BANKER_BASE: f64 = 0.446;
/// Player win probability with a neutral shoe.
pub const PLAYER_BASE: f64 = 0.445;
/// How far the low/high imbalance moves banker and player.
pub const IMBALANCE_WEIGHT: f64 = 0.1;
/// Banker Pair and Player Pair hit rate.
pub const PAIR_PROB: f64 = 0.074;
/// Super 6 hit rate.
pub const SUPER6_PROB: f64 = 0.053;

/// Rank ranges (inclusive) of the three buckets.
const LOW: (u8, u8) = (1, 4);
const MID: (u8, u8) = (5, 8);
const HIGH: (u8, u8) = (9, 13);

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// Remaining cards per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets {
    pub low: u32,
    pub mid: u32,
    pub high: u32,
}

impl Buckets {
    pub fn from_shoe(shoe: &ShoeState) -> Self {
        Self {
            low: shoe.sum_range(LOW.0, LOW.1),
            mid: shoe.sum_range(MID.0, MID.1),
            high: shoe.sum_range(HIGH.0, HIGH.1),
        }
    }

    pub fn total(&self) -> u32 {
        self.low + self.mid + self.high
    }

    /// `(low - high) / total`, positive when small cards dominate.
    fn imbalance(&self) -> f64 {
        (self.low as f64 - self.high as f64) / self.total() as f64
    }
}

// ---------------------------------------------------------------------------
// Probabilities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub banker: f64,
    pub player: f64,
    pub tie: f64,
    pub banker_pair: f64,
    pub player_pair: f64,
    pub super6: f64,
}

impl Probabilities {
    pub fn of(&self, outcome: BetOutcome) -> f64 {
        match outcome {
            BetOutcome::Banker => self.banker,
            BetOutcome::Player => self.player,
            BetOutcome::Tie => self.tie,
            BetOutcome::BankerPair => self.banker_pair,
            BetOutcome::PlayerPair => self.player_pair,
            BetOutcome::Super6 => self.super6,
        }
    }
}

/// Estimate outcome probabilities for the current shoe.
///
/// Returns `None` for an exhausted shoe.
pub fn estimate(shoe: &ShoeState) -> Option<Probabilities> {
    let buckets = Buckets::from_shoe(shoe);
    if buckets.total() == 0 {
        return None;
    }
    debug_assert_eq!(buckets.total(), shoe.total());

    let imbalance = buckets.imbalance();
    let banker = BANKER_BASE + imbalance * IMBALANCE_WEIGHT;
    let player = PLAYER_BASE - imbalance * IMBALANCE_WEIGHT;
    // Closure: the three main outcomes always sum to one.
    let tie = 1.0 - banker - player;

    debug!(
        low = buckets.low,
        mid = buckets.mid,
        high = buckets.high,
        banker = format!("{:.4}", banker),
        player = format!("{:.4}", player),
        tie = format!("{:.4}", tie),
        "Probabilities estimated"
    );

    Some(Probabilities {
        banker,
        player,
        tie,
        banker_pair: PAIR_PROB,
        player_pair: PAIR_PROB,
        super6: SUPER6_PROB,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shoe::ShoeTracker;
    use crate::types::Rank;

    #[test]
    fn test_fresh_shoe_buckets() {
        let shoe = ShoeTracker::default().snapshot();
        let b = Buckets::from_shoe(&shoe);
        assert_eq!(b.low, 128);
        assert_eq!(b.mid, 128);
        assert_eq!(b.high, 160);
        assert_eq!(b.total(), 416);
    }

    #[test]
    fn test_fresh_shoe_probabilities() {
        let p = estimate(&ShoeTracker::default().snapshot()).unwrap();
        // Exact formula values
        assert!((p.banker - (0.446 - 32.0 / 416.0 * 0.1)).abs() < 1e-12);
        assert!((p.player - (0.445 + 32.0 / 416.0 * 0.1)).abs() < 1e-12);
        assert!((p.tie - 0.109).abs() < 1e-9);
        // Published approximations
        assert!((p.banker - 0.43808).abs() < 5e-4);
        assert!((p.player - 0.45269).abs() < 5e-4);
        assert!((p.tie - 0.10923).abs() < 5e-4);
    }

    #[test]
    fn test_closure_holds_while_dealing() {
        let mut tracker = ShoeTracker::default();
        // Deal a lopsided sequence and check closure after every card.
        for i in 0..300u32 {
            let v = (i % 7 + 1) as u8 + if i % 3 == 0 { 6 } else { 0 };
            let _ = tracker.remove_card(Rank::new(v).unwrap());
            let p = estimate(&tracker.snapshot()).unwrap();
            assert!((p.banker + p.player + p.tie - 1.0).abs() < 1e-9);
            assert!(p.banker > 0.0 && p.banker < 1.0);
            assert!(p.player > 0.0 && p.player < 1.0);
        }
    }

    #[test]
    fn test_side_bets_constant() {
        let mut tracker = ShoeTracker::default();
        for _ in 0..32 {
            let _ = tracker.remove_card(Rank::KING);
        }
        let p = estimate(&tracker.snapshot()).unwrap();
        assert_eq!(p.banker_pair, 0.074);
        assert_eq!(p.player_pair, 0.074);
        assert_eq!(p.super6, 0.053);
        assert_eq!(p.of(BetOutcome::Super6), 0.053);
    }

    #[test]
    fn test_low_cards_favour_banker() {
        let mut tracker = ShoeTracker::default();
        for v in 9..=13 {
            for _ in 0..32 {
                let _ = tracker.remove_card(Rank::new(v).unwrap());
            }
        }
        let p = estimate(&tracker.snapshot()).unwrap();
        assert!((p.banker - 0.496).abs() < 1e-9);
        assert!((p.player - 0.395).abs() < 1e-9);
    }

    #[test]
    fn test_empty_shoe_has_no_estimate() {
        let mut tracker = ShoeTracker::new(1);
        for r in Rank::all() {
            for _ in 0..4 {
                let _ = tracker.remove_card(r);
            }
        }
        assert_eq!(tracker.total(), 0);
        assert!(estimate(&tracker.snapshot()).is_none());
    }
}
