//! Classification of an improve-round response.

use crate::core::fence::extract_code;

/// Token the service answers with when it has nothing left to change.
pub const CONVERGENCE_SENTINEL: &str = "IMPROVEDMAX";

/// What one improve round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovementOutcome {
    /// Code to persist: first fenced block, or the whole response.
    pub code: String,
    /// True iff the raw response contains [`CONVERGENCE_SENTINEL`] anywhere.
    pub converged: bool,
}

impl ImprovementOutcome {
    pub fn from_response(raw: &str) -> Self {
        Self {
            code: extract_code(raw).to_string(),
            converged: raw.contains(CONVERGENCE_SENTINEL),
        }
    }
}
