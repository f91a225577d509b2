//! Shoe state — per-rank remaining counts for a multi-deck shoe.

pub mod history;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Rank;

/// Decks in a standard baccarat shoe.
pub const DEFAULT_DECKS: u8 = 8;

/// Cards of each rank per deck (one per suit).
const SUITS: u32 = 4;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable copy of the shoe composition for read-only consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoeState {
    counts: [u32; Rank::COUNT],
    total: u32,
    decks: u8,
}

impl ShoeState {
    pub fn count(&self, rank: Rank) -> u32 {
        self.counts[rank.index()]
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Remaining counts paired with their rank, Ace first.
    pub fn by_rank(&self) -> Vec<(Rank, u32)> {
        Rank::all().map(|r| (r, self.count(r))).collect()
    }

    /// Sum of remaining counts over an inclusive rank range.
    pub fn sum_range(&self, lo: u8, hi: u8) -> u32 {
        Rank::all()
            .filter(|r| (lo..=hi).contains(&r.value()))
            .map(|r| self.count(r))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Outcome of removing a card from the shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Removal {
    /// The card was taken; carries the count left for that rank.
    Removed { remaining: u32 },
    /// No cards of that rank were left; nothing changed.
    Depleted,
}

impl Removal {
    pub fn accepted(&self) -> bool {
        matches!(self, Removal::Removed { .. })
    }
}

/// Owns the remaining per-rank counts of one shoe.
///
/// Counts only move through `remove_card` (down) and `restore_card` (up,
/// capped at the per-rank maximum), so every count stays within
/// `0..=decks * 4` and `total` always equals their sum.
#[derive(Debug, Clone)]
pub struct ShoeTracker {
    state: ShoeState,
}

impl ShoeTracker {
    pub fn new(decks: u8) -> Self {
        let mut tracker = Self {
            state: ShoeState {
                counts: [0; Rank::COUNT],
                total: 0,
                decks,
            },
        };
        tracker.reset(decks);
        tracker
    }

    /// Refill the shoe with `decks` full decks.
    pub fn reset(&mut self, decks: u8) {
        let per_rank = decks as u32 * SUITS;
        self.state = ShoeState {
            counts: [per_rank; Rank::COUNT],
            total: per_rank * Rank::COUNT as u32,
            decks,
        };
        debug!(decks, total = self.state.total, "Shoe reset");
    }

    /// Maximum count any single rank can hold.
    pub fn per_rank_max(&self) -> u32 {
        self.state.decks as u32 * SUITS
    }

    /// Total cards in a full shoe of this size.
    pub fn initial_total(&self) -> u32 {
        self.per_rank_max() * Rank::COUNT as u32
    }

    pub fn remove_card(&mut self, rank: Rank) -> Removal {
        let slot = &mut self.state.counts[rank.index()];
        if *slot == 0 {
            return Removal::Depleted;
        }
        *slot -= 1;
        self.state.total -= 1;
        Removal::Removed { remaining: *slot }
    }

    /// Put a card back. Used only by undo; never exceeds the per-rank max.
    pub fn restore_card(&mut self, rank: Rank) {
        let max = self.per_rank_max();
        let slot = &mut self.state.counts[rank.index()];
        if *slot < max {
            *slot += 1;
            self.state.total += 1;
        }
    }

    pub fn count(&self, rank: Rank) -> u32 {
        self.state.count(rank)
    }

    pub fn total(&self) -> u32 {
        self.state.total
    }

    pub fn snapshot(&self) -> ShoeState {
        self.state.clone()
    }
}

impl Default for ShoeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DECKS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
