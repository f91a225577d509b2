//! Core engine — one `Session` per table.
//!
//! A session owns its shoe, history and settings. Every mutation reruns
//! the probability → EV → sizing pipeline before returning, so `advice()`
//! always reflects the current shoe.

pub mod command;
pub mod feed;
pub mod settings;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::shoe::history::{HistoryLog, Undone};
use crate::shoe::{Removal, ShoeState, ShoeTracker, DEFAULT_DECKS};
use crate::strategy::ev::PayoutTable;
use crate::strategy::{Advice, Advisor};
use crate::types::{Rank, Recommendation, SabotError};
use command::Command;
use settings::Settings;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of `add_card`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAdmission {
    /// False when the rank was already depleted; nothing changed.
    pub accepted: bool,
}

/// What applying a command did, for the caller to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Card(CardAdmission),
    Separator,
    Undo(Undone),
    Reset { decks: u8 },
    Settings(Result<(), SabotError>),
    Status,
    Quit,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Construction parameters for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub decks: u8,
    pub settings: Settings,
    pub payouts: PayoutTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decks: DEFAULT_DECKS,
            settings: Settings::default(),
            payouts: PayoutTable::default(),
        }
    }
}

/// An independent shoe-tracking session.
pub struct Session {
    id: Uuid,
    decks: u8,
    shoe: ShoeTracker,
    history: HistoryLog,
    settings: Settings,
    advisor: Advisor,
    advice: Option<Advice>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            decks: config.decks,
            shoe: ShoeTracker::new(config.decks),
            history: HistoryLog::new(),
            settings: config.settings,
            advisor: Advisor::new(config.payouts),
            advice: None,
        };
        session.recompute();
        info!(session = %session.id, decks = session.decks, "Session opened");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Record a card leaving the shoe.
    pub fn add_card(&mut self, rank: Rank) -> CardAdmission {
        match self.shoe.remove_card(rank) {
            Removal::Removed { remaining } => {
                self.history.record_card(rank);
                self.recompute();
                debug!(
                    session = %self.id,
                    rank = %rank,
                    rank_remaining = remaining,
                    total = self.shoe.total(),
                    "Card recorded"
                );
                CardAdmission { accepted: true }
            }
            Removal::Depleted => {
                warn!(
                    session = %self.id,
                    error = %SabotError::RankDepleted(rank),
                    "Card rejected"
                );
                CardAdmission { accepted: false }
            }
        }
    }

    /// Mark a round boundary.
    pub fn record_separator(&mut self) {
        self.history.record_separator();
    }

    /// Undo the most recent history entry.
    pub fn undo(&mut self) -> Undone {
        let undone = self.history.undo(&mut self.shoe);
        if let Undone::Card(_) = undone {
            self.recompute();
        }
        undone
    }

    /// Refill the shoe with `decks` decks and clear the history.
    pub fn reset(&mut self, decks: u8) {
        self.decks = decks;
        self.shoe.reset(decks);
        self.history.clear();
        self.recompute();
        info!(session = %self.id, decks, "Shoe reset");
    }

    /// Apply capital and commission percent, then return the ranked list.
    ///
    /// Invalid values keep the last-known-good settings. Empty when the
    /// shoe is exhausted.
    pub fn recommendations(&mut self, capital: f64, commission_percent: f64) -> &[Recommendation] {
        if self.settings.apply(capital, commission_percent) {
            self.recompute();
        }
        self.advice
            .as_ref()
            .map(|a| a.recommendations.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the settings wholesale and recompute.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.recompute();
    }

    /// Apply one operator or feed command.
    pub fn apply(&mut self, command: Command) -> Applied {
        match command {
            Command::Card(rank) => Applied::Card(self.add_card(rank)),
            Command::Separator => {
                self.record_separator();
                Applied::Separator
            }
            Command::Undo => Applied::Undo(self.undo()),
            Command::Reset(decks) => {
                let decks = decks.unwrap_or(self.decks);
                self.reset(decks);
                Applied::Reset { decks }
            }
            Command::Capital(input) => {
                let result = self.settings.set_capital_str(&input);
                self.after_settings_change(&result);
                Applied::Settings(result)
            }
            Command::Commission(input) => {
                let result = self.settings.set_commission_str(&input);
                self.after_settings_change(&result);
                Applied::Settings(result)
            }
            Command::Status => Applied::Status,
            Command::Quit => Applied::Quit,
        }
    }

    fn after_settings_change(&mut self, result: &Result<(), SabotError>) {
        match result {
            Ok(()) => {
                info!(
                    session = %self.id,
                    capital = %self.settings.capital,
                    commission = self.settings.commission_percent,
                    "Settings updated"
                );
                self.recompute();
            }
            Err(e) => warn!(session = %self.id, error = %e, "Settings unchanged"),
        }
    }

    fn recompute(&mut self) {
        self.advice = self.advisor.advise(
            &self.shoe.snapshot(),
            self.settings.capital,
            self.settings.commission_rate(),
        );
        if self.advice.is_none() {
            debug!(session = %self.id, error = %SabotError::EmptyShoe, "No advice");
        }
    }

    // -- Read access -------------------------------------------------------

    /// Latest pipeline result; `None` for an exhausted shoe.
    pub fn advice(&self) -> Option<&Advice> {
        self.advice.as_ref()
    }

    pub fn remaining_total(&self) -> u32 {
        self.shoe.total()
    }

    pub fn remaining_by_rank(&self) -> Vec<(Rank, u32)> {
        self.shoe.snapshot().by_rank()
    }

    pub fn shoe(&self) -> ShoeState {
        self.shoe.snapshot()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    /// Capital as a float, for display.
    pub fn capital_f64(&self) -> f64 {
        self.settings.capital.to_f64().unwrap_or(0.0)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
