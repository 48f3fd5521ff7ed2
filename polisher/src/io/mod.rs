//! I/O helpers for a polishing session.

pub mod completion;
pub mod config;
pub mod console;
pub mod credentials;
pub mod prompt;
pub mod retry;
pub mod target;
