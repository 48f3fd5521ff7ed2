//! Interactive code polisher backed by a chat-completion service.
//!
//! A session reads one source file, asks the service for its language and
//! purpose, then asks it to refactor / optimize / improve the file, optionally
//! saving and repeating until the service reports it has nothing left to
//! change. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (answer parsing, fenced-block
//!   extraction, convergence detection, normalization, backoff).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, credentials, HTTP, console,
//!   target file, prompt rendering). Behind traits where tests need to script them.
//!
//! Orchestration modules ([`interact`], [`improve`], [`preview`]) coordinate
//! core logic with I/O to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod improve;
pub mod interact;
pub mod io;
pub mod logging;
pub mod preview;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
