//! Parsing of operator answers to interactive questions.
//!
//! Parsers never loop; they classify one answer. Re-asking is the caller's job.

use std::fmt;

use crate::core::types::Mode;

/// Why a mode answer was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRejection {
    /// The answer is not an integer.
    NotANumber,
    /// The answer is an integer outside `1..=4`.
    OutOfRange,
}

impl fmt::Display for ModeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => f.write_str("Invalid input. Please enter a number."),
            Self::OutOfRange => {
                f.write_str("Invalid input. Please enter a number between 1 and 4.")
            }
        }
    }
}

/// Parse the answer to "what would you like me to do with this code?".
pub fn parse_mode(answer: &str) -> Result<Mode, ModeRejection> {
    let choice: i64 = answer
        .trim()
        .parse()
        .map_err(|_| ModeRejection::NotANumber)?;
    Mode::from_choice(choice).ok_or(ModeRejection::OutOfRange)
}

/// Parse a case-insensitive `Y`/`N` answer. Anything else yields `None`.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("y") {
        Some(true)
    } else if answer.eq_ignore_ascii_case("n") {
        Some(false)
    } else {
        None
    }
}
