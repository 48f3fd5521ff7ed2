//! Deterministic, pure logic shared by the polisher.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! strings and return deterministic outputs suitable for tests.

pub mod answer;
pub mod fence;
pub mod normalize;
pub mod outcome;
pub mod retry;
pub mod types;
