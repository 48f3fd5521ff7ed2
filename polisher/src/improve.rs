//! The improvement loop: classify, describe, then improve until done.
//!
//! ```text
//! ClassifyLanguage -> DescribePurpose -> Improve
//! Improve -> Converged                 (response contains the sentinel)
//! Improve -> AwaitSaveDecision         (not recursive)
//! Improve -> Save                      (recursive)
//! AwaitSaveDecision -> Save | Done     (operator answers Y | N)
//! Save -> Improve                      (recursive, re-reads the file)
//! Save -> Done                         (not recursive)
//! ```
//!
//! File errors end the loop with a `ReadFailed` / `WriteFailed` stop after
//! being reported on the console. Completion errors propagate to the caller.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::core::normalize::prepare;
use crate::core::outcome::ImprovementOutcome;
use crate::core::types::{PromptContext, Session};
use crate::interact::{SAVE_QUESTION, SAVE_REJECTION, ask_yes_no};
use crate::io::completion::{CompletionRequest, Completer};
use crate::io::config::PolisherConfig;
use crate::io::console::{self, Console};
use crate::io::prompt::PromptEngine;
use crate::io::target::{read_source, write_source};

/// Reason why `run_loop` stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    /// The service answered with the convergence sentinel. Nothing was written
    /// in that round.
    Converged,
    /// The operator declined to save.
    Declined,
    /// A non-recursive session saved its single improvement.
    Saved,
    /// A recursive session reached the configured `max_rounds`.
    RoundLimit { max_rounds: u32 },
    /// The target file could not be read.
    ReadFailed { path: PathBuf, message: String },
    /// The target file could not be written.
    WriteFailed { path: PathBuf, message: String },
}

impl LoopStop {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ReadFailed { .. } | Self::WriteFailed { .. })
    }
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    /// Improve rounds that received a response.
    pub rounds: u32,
    /// Times the target file was overwritten.
    pub saves: u32,
    pub stop: LoopStop,
}

enum State {
    ClassifyLanguage,
    DescribePurpose { language: String, code: String },
    Improve(PromptContext),
    AwaitSaveDecision { prompt: PromptContext, code: String },
    Save { prompt: PromptContext, code: String },
}

/// Drive one session through the improvement state machine.
#[instrument(skip_all, fields(path = %session.file_path.display(), mode = ?session.mode, recursive = session.recursive))]
pub fn run_loop<C: Completer, K: Console>(
    session: &Session,
    completer: &C,
    console: &mut K,
    prompts: &PromptEngine,
    config: &PolisherConfig,
) -> Result<LoopOutcome> {
    let path = session.file_path.as_path();
    let mut rounds = 0u32;
    let mut saves = 0u32;
    let mut state = State::ClassifyLanguage;

    let stop = loop {
        state = match state {
            State::ClassifyLanguage => {
                let source = match read_source(path) {
                    Ok(source) => source,
                    Err(err) => break read_failed(console, path, &err),
                };
                let code = prepare(&source, config.normalize);
                let prompt = prompts.render_classify(&code)?;
                let language =
                    completer.complete(&CompletionRequest::new(prompt, config.classify))?;
                console.say(&console::service(&format!(
                    "Code written in {}",
                    language.trim()
                )));
                State::DescribePurpose { language, code }
            }
            State::DescribePurpose { language, code } => {
                console.say(&console::service("Detecting Code Purpose..."));
                let prompt = prompts.render_describe(&language, &code)?;
                let purpose =
                    completer.complete(&CompletionRequest::new(prompt, config.describe))?;
                debug!(purpose = %purpose.trim(), "purpose described");
                State::Improve(PromptContext { language, purpose })
            }
            State::Improve(prompt) => {
                if config.max_rounds > 0 && rounds >= config.max_rounds {
                    info!(rounds, "round limit reached");
                    break LoopStop::RoundLimit {
                        max_rounds: config.max_rounds,
                    };
                }
                let source = match read_source(path) {
                    Ok(source) => source,
                    Err(err) => break read_failed(console, path, &err),
                };
                if config.normalize {
                    console.say(&console::system("Compressing Code..."));
                }
                let code = prepare(&source, config.normalize);
                console.say(&console::service(&format!(
                    "I Will {} The Code... (This may take a while)",
                    session.mode
                )));
                let request = prompts.render_improve(session.mode, &prompt, &code)?;
                let raw = completer.complete(&CompletionRequest::new(request, config.improve))?;
                rounds += 1;
                console.say(&raw);

                let outcome = ImprovementOutcome::from_response(&raw);
                if outcome.converged {
                    info!(rounds, "service reported no further improvement");
                    console.say(&console::service("Code cannot be improved any further."));
                    break LoopStop::Converged;
                }
                if session.recursive {
                    State::Save {
                        prompt,
                        code: outcome.code,
                    }
                } else {
                    State::AwaitSaveDecision {
                        prompt,
                        code: outcome.code,
                    }
                }
            }
            State::AwaitSaveDecision { prompt, code } => {
                if ask_yes_no(console, SAVE_QUESTION, SAVE_REJECTION)? {
                    console.say("Saving updated code to file path...");
                    State::Save { prompt, code }
                } else {
                    console.say("Exiting without saving...");
                    break LoopStop::Declined;
                }
            }
            State::Save { prompt, code } => {
                if let Err(err) = write_source(path, &code) {
                    break write_failed(console, path, &err);
                }
                saves += 1;
                console.say(&console::system(
                    "The file has been saved with the improved code!",
                ));
                if session.recursive {
                    State::Improve(prompt)
                } else {
                    break LoopStop::Saved;
                }
            }
        };
    };

    Ok(LoopOutcome {
        rounds,
        saves,
        stop,
    })
}

fn read_failed<K: Console>(console: &mut K, path: &Path, err: &anyhow::Error) -> LoopStop {
    warn!(path = %path.display(), err = %format!("{err:#}"), "target read failed");
    console.say(&console::problem(&format!("{err:#}")));
    LoopStop::ReadFailed {
        path: path.to_path_buf(),
        message: format!("{err:#}"),
    }
}

fn write_failed<K: Console>(console: &mut K, path: &Path, err: &anyhow::Error) -> LoopStop {
    warn!(path = %path.display(), err = %format!("{err:#}"), "target write failed");
    console.say(&console::problem(&format!("{err:#}")));
    LoopStop::WriteFailed {
        path: path.to_path_buf(),
        message: format!("{err:#}"),
    }
}
