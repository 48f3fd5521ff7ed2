//! Stable exit codes for the polisher CLI.

/// Session finished: converged, saved, declined, or hit its round limit.
pub const OK: i32 = 0;
/// Invalid config, file read/write failure, or completion-service error.
pub const FAILED: i32 = 1;
/// Operator input ended before every question was answered.
pub const INPUT_CLOSED: i32 = 2;
