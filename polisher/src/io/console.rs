//! Operator console: line-based questions and status lines.
//!
//! The [`Console`] trait keeps the controller and the improvement loop
//! independent of stdin/stdout so tests can script the operator. Colors are
//! cosmetic; `colored` drops them when output is not a terminal or
//! `NO_COLOR` is set.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;

pub trait Console {
    /// Show `question` and read one answer line without its line ending.
    ///
    /// Returns `None` once input is exhausted.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Print one status line.
    fn say(&mut self, line: &str);
}

/// Console backed by the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct Terminal;

impl Console for Terminal {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}").context("write question")?;
        stdout.flush().context("flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read answer from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }
}

/// A question, highlighted.
pub fn question(text: &str) -> String {
    format!("{} ", text.blue())
}

/// A line attributed to the completion service.
pub fn service(text: &str) -> String {
    format!("{} {}", "GPT:".bright_green(), text.white())
}

/// A line attributed to the tool itself.
pub fn system(text: &str) -> String {
    format!("{} {}", "SYSTEM:".yellow(), text.white())
}

/// A rejection or failure message.
pub fn problem(text: &str) -> String {
    text.red().to_string()
}
