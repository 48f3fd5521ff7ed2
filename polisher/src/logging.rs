//! Diagnostic tracing for polisher sessions.
//!
//! Tracing goes to stderr and is filtered by `RUST_LOG`. It shows request
//! timings, retries and state transitions of the improvement loop.
//!
//! The operator dialogue (questions, `GPT:` echoes, `SYSTEM:` notices) is
//! written by `io::console` to stdout and is never affected by the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable. Keeps retry warnings
/// and a missing API key visible without cluttering the dialogue.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Call once, before anything logs.
///
/// Follow one session's requests and loop states:
/// ```bash
/// RUST_LOG=polisher::improve=debug,polisher::io::completion=debug polisher app.js
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();
}
