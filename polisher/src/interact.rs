//! Interactive collection of a [`Session`].
//!
//! Questions are asked in a fixed order: file path, mode, recursive flag. An
//! invalid answer prints a rejection and the same question is asked again;
//! there is no attempt limit. Values supplied up front skip their question.
//! End of input is an error rather than an endless re-prompt.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::core::answer::{parse_mode, parse_yes_no};
use crate::core::types::{Mode, Session};
use crate::io::console::{self, Console};

pub const FILE_PATH_QUESTION: &str = "What is the file path for the code you want to improve?";
pub const MODE_QUESTION: &str = "What would you like me to do with this code? (1: Refactor, 2: Optimize, 3: Improve, 4: All)";
pub const RECURSIVE_QUESTION: &str = "Would you like to recursively update this code? (Y/N)";
pub const SAVE_QUESTION: &str = "Would you like me to save the updated code to the file path? (Y/N)";

pub const RECURSIVE_REJECTION: &str = "Invalid input. Please input Y for yes or N for no.";
pub const SAVE_REJECTION: &str = "Invalid input. Please enter either Y or N. (Y for Yes, N for No)";

/// Operator input ended while a question was still unanswered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputClosedError {
    pub question: &'static str,
}

impl fmt::Display for InputClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input closed before an answer to: {}", self.question)
    }
}

impl std::error::Error for InputClosedError {}

/// Answers supplied up front (for example on the command line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presets {
    pub file_path: Option<PathBuf>,
    pub mode: Option<Mode>,
    pub recursive: Option<bool>,
}

/// Ask for whatever `presets` leaves open and return a validated session.
pub fn collect_session<C: Console>(console: &mut C, presets: Presets) -> Result<Session> {
    let file_path = match presets.file_path {
        Some(path) => path,
        None => PathBuf::from(ask(console, FILE_PATH_QUESTION)?.trim()),
    };
    let mode = match presets.mode {
        Some(mode) => mode,
        None => ask_mode(console)?,
    };
    let recursive = match presets.recursive {
        Some(recursive) => recursive,
        None => ask_yes_no(console, RECURSIVE_QUESTION, RECURSIVE_REJECTION)?,
    };
    Ok(Session {
        file_path,
        mode,
        recursive,
    })
}

/// Ask for the mode until the answer is a number in `1..=4`.
fn ask_mode<C: Console>(console: &mut C) -> Result<Mode> {
    loop {
        match parse_mode(&ask(console, MODE_QUESTION)?) {
            Ok(mode) => return Ok(mode),
            Err(rejection) => {
                debug!(?rejection, "mode answer rejected");
                console.say(&console::problem(&rejection.to_string()));
            }
        }
    }
}

/// Ask a Y/N question until it gets a valid answer, printing `rejection`
/// after each invalid one.
pub fn ask_yes_no<C: Console>(
    console: &mut C,
    question: &'static str,
    rejection: &str,
) -> Result<bool> {
    loop {
        match parse_yes_no(&ask(console, question)?) {
            Some(answer) => return Ok(answer),
            None => console.say(&console::problem(rejection)),
        }
    }
}

fn ask<C: Console>(console: &mut C, question: &'static str) -> Result<String> {
    console
        .ask(&console::question(question))?
        .ok_or_else(|| InputClosedError { question }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedConsole;

    fn asked(console: &ScriptedConsole, question: &str) -> usize {
        console.asked.iter().filter(|q| q.contains(question)).count()
    }

    #[test]
    fn collects_all_three_answers_in_order() {
        let mut console = ScriptedConsole::new(["src/app.js", "2", "n"]);
        let session = collect_session(&mut console, Presets::default()).expect("session");
        assert_eq!(
            session,
            Session {
                file_path: PathBuf::from("src/app.js"),
                mode: Mode::Optimize,
                recursive: false,
            }
        );
        assert_eq!(console.asked.len(), 3);
    }

    #[test]
    fn invalid_mode_answers_reissue_the_mode_question() {
        let mut console = ScriptedConsole::new(["a.py", "abc", "0", "5", "", "4", "Y"]);
        let session = collect_session(&mut console, Presets::default()).expect("session");
        assert_eq!(session.mode, Mode::All);
        assert!(session.recursive);
        assert_eq!(asked(&console, MODE_QUESTION), 5);
        assert_eq!(asked(&console, RECURSIVE_QUESTION), 1);
        assert!(console.said.iter().any(|l| l.contains("Please enter a number.")));
        assert!(
            console
                .said
                .iter()
                .any(|l| l.contains("between 1 and 4"))
        );
    }

    #[test]
    fn invalid_recursive_answers_reissue_the_recursive_question() {
        let mut console = ScriptedConsole::new(["a.py", "1", "yes", "maybe", "n"]);
        let session = collect_session(&mut console, Presets::default()).expect("session");
        assert_eq!(session.mode, Mode::Refactor);
        assert!(!session.recursive);
        assert_eq!(asked(&console, MODE_QUESTION), 1);
        assert_eq!(asked(&console, RECURSIVE_QUESTION), 3);
        let rejections: Vec<_> = console
            .said
            .iter()
            .filter(|l| l.contains("Invalid input"))
            .collect();
        assert_eq!(rejections.len(), 2);
        assert!(rejections.iter().all(|l| l.contains(RECURSIVE_REJECTION)));
    }

    #[test]
    fn presets_skip_their_questions() {
        let mut console = ScriptedConsole::new(["y"]);
        let session = collect_session(
            &mut console,
            Presets {
                file_path: Some(PathBuf::from("lib.rs")),
                mode: Some(Mode::Improve),
                recursive: None,
            },
        )
        .expect("session");
        assert!(session.recursive);
        assert_eq!(console.asked.len(), 1);
        assert!(console.asked[0].contains(RECURSIVE_QUESTION));
    }

    #[test]
    fn closed_input_is_an_error_not_a_spin() {
        let mut console = ScriptedConsole::new(["a.py", "nope"]);
        let err = collect_session(&mut console, Presets::default()).expect_err("closed");
        let closed = err
            .downcast_ref::<InputClosedError>()
            .expect("input closed error");
        assert_eq!(closed.question, MODE_QUESTION);
    }

    #[test]
    fn yes_no_is_case_insensitive_and_retries() {
        let mut console = ScriptedConsole::new(["", "x", "N"]);
        assert!(!ask_yes_no(&mut console, SAVE_QUESTION, SAVE_REJECTION).expect("answer"));
        assert_eq!(asked(&console, SAVE_QUESTION), 3);
        assert_eq!(console.said.len(), 2);
        assert!(console.said.iter().all(|l| l.contains(SAVE_REJECTION)));
    }
}
