//! Bankroll settings with last-known-good fallback.
//!
//! Capital and commission arrive as plain user input. Anything that does
//! not parse or is out of range is rejected and the previous value stays
//! in force; a bad input never blocks a recompute.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::SabotError;

/// Commission percentages at or above this would leave the banker
/// payout non-positive.
const MAX_COMMISSION_PERCENT: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Bankroll in currency units.
    pub capital: Decimal,
    /// Commission as a percentage, e.g. 2.0 for 2%.
    pub commission_percent: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capital: dec!(10000000),
            commission_percent: 2.0,
        }
    }
}

impl Settings {
    /// Validated constructor.
    pub fn new(capital: Decimal, commission_percent: f64) -> Result<Self, SabotError> {
        Ok(Self {
            capital: validate_capital(capital)?,
            commission_percent: validate_commission(commission_percent)?,
        })
    }

    /// Commission as a fraction (percent / 100).
    pub fn commission_rate(&self) -> f64 {
        self.commission_percent / 100.0
    }

    pub fn set_capital(&mut self, capital: Decimal) -> Result<(), SabotError> {
        self.capital = validate_capital(capital)?;
        Ok(())
    }

    pub fn set_commission(&mut self, percent: f64) -> Result<(), SabotError> {
        self.commission_percent = validate_commission(percent)?;
        Ok(())
    }

    /// Parse and apply a capital string; keeps the old value on failure.
    pub fn set_capital_str(&mut self, input: &str) -> Result<(), SabotError> {
        let capital = Decimal::from_str(input.trim()).map_err(|_| invalid("capital", input))?;
        self.set_capital(capital)
    }

    /// Parse and apply a commission percent string; keeps the old value on failure.
    pub fn set_commission_str(&mut self, input: &str) -> Result<(), SabotError> {
        let percent: f64 = input.trim().parse().map_err(|_| invalid("commission", input))?;
        self.set_commission(percent)
    }

    /// Apply plain numeric inputs, falling back field by field.
    ///
    /// Returns `true` if anything changed.
    pub fn apply(&mut self, capital: f64, commission_percent: f64) -> bool {
        let before = self.clone();
        match Decimal::from_f64(capital).ok_or_else(|| invalid("capital", capital)) {
            Ok(c) => {
                if let Err(e) = self.set_capital(c) {
                    warn!(error = %e, "Keeping previous capital");
                }
            }
            Err(e) => warn!(error = %e, "Keeping previous capital"),
        }
        if let Err(e) = self.set_commission(commission_percent) {
            warn!(error = %e, "Keeping previous commission");
        }
        *self != before
    }
}

fn invalid(field: &str, value: impl ToString) -> SabotError {
    SabotError::InvalidConfiguration {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn validate_capital(capital: Decimal) -> Result<Decimal, SabotError> {
    if capital > Decimal::ZERO {
        Ok(capital)
    } else {
        Err(invalid("capital", capital))
    }
}

fn validate_commission(percent: f64) -> Result<f64, SabotError> {
    if percent.is_finite() && (0.0..MAX_COMMISSION_PERCENT).contains(&percent) {
        Ok(percent)
    } else {
        Err(invalid("commission", percent))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
