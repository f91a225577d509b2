//! Shared types for SABOT.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the shoe, strategy and engine
//! modules can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// A card rank independent of suit: Ace = 1 … King = 13.
///
/// Ten and the face cards all score zero in baccarat but stay distinct
/// ranks so that shoe depletion is tracked per rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const KING: Rank = Rank(13);

    /// Number of distinct ranks in a deck.
    pub const COUNT: usize = 13;

    /// Display labels indexed by `value() - 1`.
    pub const LABELS: [&'static str; 13] =
        ["A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K"];

    /// Build a rank from its numeric value (1..=13).
    pub fn new(value: u8) -> Result<Self, SabotError> {
        if (1..=13).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(SabotError::InvalidRank(value.to_string()))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Zero-based index for per-rank tables.
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// All ranks in ascending order.
    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=13).map(Rank)
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<u8> for Rank {
    type Error = SabotError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::new(value)
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

/// Parse a card label as typed at the table (case-insensitive).
///
/// Accepts `A`/`1`, `2`..`9`, `10`/`0`/`T`, `J`, `Q`, `K`.
impl std::str::FromStr for Rank {
    type Err = SabotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s.trim().to_ascii_uppercase().as_str() {
            "A" | "1" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            "5" => 5,
            "6" => 6,
            "7" => 7,
            "8" => 8,
            "9" => 9,
            "10" | "0" | "T" => 10,
            "J" => 11,
            "Q" => 12,
            "K" => 13,
            _ => return Err(SabotError::InvalidRank(s.trim().to_string())),
        };
        Ok(Rank(value))
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The hand a card was dealt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Banker,
    Player,
}

impl Side {
    /// Side for the `n`-th card event of the shoe (zero-based).
    /// Cards alternate Banker, Player, Banker, … as entered.
    pub fn for_sequence(n: usize) -> Self {
        if n % 2 == 0 {
            Side::Banker
        } else {
            Side::Player
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Banker => write!(f, "Banker"),
            Side::Player => write!(f, "Player"),
        }
    }
}

/// The six wagers the advisor prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetOutcome {
    Banker,
    Player,
    Tie,
    BankerPair,
    PlayerPair,
    Super6,
}

impl BetOutcome {
    /// All outcomes in declaration order (the tie-break order for ranking).
    pub const ALL: [BetOutcome; 6] = [
        BetOutcome::Banker,
        BetOutcome::Player,
        BetOutcome::Tie,
        BetOutcome::BankerPair,
        BetOutcome::PlayerPair,
        BetOutcome::Super6,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BetOutcome::Banker => "Banker",
            BetOutcome::Player => "Player",
            BetOutcome::Tie => "Tie",
            BetOutcome::BankerPair => "Banker Pair",
            BetOutcome::PlayerPair => "Player Pair",
            BetOutcome::Super6 => "Super 6",
        }
    }
}

impl fmt::Display for BetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// One priced and sized wager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub outcome: BetOutcome,
    pub label: String,
    /// Win probability (0.0–1.0).
    pub probability: f64,
    /// Expected value per unit staked.
    pub ev: f64,
    /// Net units returned per unit staked on a win.
    pub payout: f64,
    /// Recommended stake in currency units.
    pub amount: u64,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = if self.amount > 0 {
            self.amount.to_string()
        } else {
            "-".to_string()
        };
        write!(
            f,
            "{:<12} {:>10}  p={:>5.1}%  EV={:+.2}%  pays {:.2}",
            self.label,
            amount,
            self.probability * 100.0,
            self.ev * 100.0,
            self.payout,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for SABOT.
///
/// None of these are fatal: callers resolve them locally and keep the
/// session state they already had.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SabotError {
    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    #[error("Rank depleted: no {0} left in the shoe")]
    RankDepleted(Rank),

    #[error("Shoe is empty, no recommendation available")]
    EmptyShoe,

    #[error("Invalid configuration ({field}): {value}")]
    InvalidConfiguration { field: String, value: String },

    #[error("Unrecognised command: {0}")]
    Command(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
