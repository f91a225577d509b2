//! Operator commands.
//!
//! One line of input maps to one command. Manual entry and the card feed
//! both produce `Command`s, which the session applies one at a time.

use std::str::FromStr;

use crate::types::{Rank, SabotError};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A card left the shoe.
    Card(Rank),
    /// Round boundary.
    Separator,
    Undo,
    /// Refill the shoe; `None` keeps the configured deck count.
    Reset(Option<u8>),
    Capital(String),
    Commission(String),
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = SabotError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        // A bare space is the separator key at the table.
        if line == " " {
            return Ok(Command::Separator);
        }

        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(SabotError::Command(line.to_string()));
        };
        let arg = words.next();

        let cmd = match head.to_ascii_lowercase().as_str() {
            "|" | "-" | "sep" => Command::Separator,
            "u" | "undo" | "back" => Command::Undo,
            "r" | "reset" | "clear" => match arg {
                None => Command::Reset(None),
                Some(decks) => match decks.parse::<u8>() {
                    Ok(n) if n > 0 => Command::Reset(Some(n)),
                    _ => return Err(SabotError::Command(line.to_string())),
                },
            },
            "capital" => Command::Capital(required(arg, line)?),
            "commission" => Command::Commission(required(arg, line)?),
            "s" | "status" => Command::Status,
            "q" | "quit" | "exit" => Command::Quit,
            _ => {
                if arg.is_some() {
                    return Err(SabotError::Command(line.to_string()));
                }
                Command::Card(head.parse()?)
            }
        };
        Ok(cmd)
    }
}

fn required(arg: Option<&str>, line: &str) -> Result<String, SabotError> {
    arg.map(str::to_string)
        .ok_or_else(|| SabotError::Command(line.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
