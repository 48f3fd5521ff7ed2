//! Shared deterministic types for a polishing session.
//!
//! These types define stable contracts between the controller, the
//! improvement loop and the completion client. They must not depend on
//! external state.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What the operator asked the service to do with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Refactor,
    Optimize,
    Improve,
    All,
}

impl Mode {
    /// Map a menu choice (`1..=4`) to a mode.
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Self::Refactor),
            2 => Some(Self::Optimize),
            3 => Some(Self::Improve),
            4 => Some(Self::All),
            _ => None,
        }
    }

    /// Instruction phrase embedded in the improve prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Refactor => "Refactor",
            Self::Optimize => "Optimize",
            Self::Improve => "Improve",
            Self::All => "Improve, Refactor, and Optimize",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.instruction())
    }
}

/// A fully validated request from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub file_path: PathBuf,
    pub mode: Mode,
    /// Keep improving and saving until the service converges.
    pub recursive: bool,
}

/// What the first two completion calls learned about the file.
///
/// Computed once per session and reused by every improve round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    /// Language name as returned by the service, unvalidated.
    pub language: String,
    /// Free-form purpose description as returned by the service.
    pub purpose: String,
}
