//! Undoable history of card events and round separators.
//!
//! Separators and cards share one ordered log so undo replays exactly the
//! order they were entered in, across round boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use super::ShoeTracker;
use crate::types::{Rank, Side};

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A single history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEntry {
    Card {
        rank: Rank,
        /// Zero-based position among card events in this shoe.
        sequence: usize,
        side: Side,
        at: DateTime<Utc>,
    },
    Separator,
}

impl HistoryEntry {
    pub fn rank(&self) -> Option<Rank> {
        match self {
            HistoryEntry::Card { rank, .. } => Some(*rank),
            HistoryEntry::Separator => None,
        }
    }
}

/// What an `undo` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undone {
    Card(Rank),
    Separator,
    Nothing,
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Most-recent-first log of card events and separators.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    cards: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a card event. The side alternates by card-event parity.
    pub fn record_card(&mut self, rank: Rank) {
        let sequence = self.cards;
        self.entries.push_front(HistoryEntry::Card {
            rank,
            sequence,
            side: Side::for_sequence(sequence),
            at: Utc::now(),
        });
        self.cards += 1;
    }

    /// Prepend a round separator. Never touches the shoe.
    pub fn record_separator(&mut self) {
        self.entries.push_front(HistoryEntry::Separator);
    }

    /// Pop the most recent entry, putting its card back into `shoe`.
    pub fn undo(&mut self, shoe: &mut ShoeTracker) -> Undone {
        let undone = match self.entries.front() {
            None => return Undone::Nothing,
            Some(HistoryEntry::Separator) => Undone::Separator,
            Some(HistoryEntry::Card { rank, .. }) => {
                shoe.restore_card(*rank);
                self.cards -= 1;
                Undone::Card(*rank)
            }
        };
        self.entries.pop_front();
        debug!(?undone, remaining_entries = self.entries.len(), "Undo");
        undone
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cards = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of card events (separators excluded).
    pub fn card_count(&self) -> usize {
        self.cards
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Card ranks grouped into rounds, oldest round first.
    ///
    /// Empty rounds (consecutive separators) are dropped.
    pub fn rounds(&self) -> Vec<Vec<Rank>> {
        let mut rounds = Vec::new();
        let mut current = Vec::new();
        for entry in self.entries.iter().rev() {
            match entry {
                HistoryEntry::Card { rank, .. } => current.push(*rank),
                HistoryEntry::Separator => {
                    if !current.is_empty() {
                        rounds.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            rounds.push(current);
        }
        rounds
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
