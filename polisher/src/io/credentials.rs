//! Completion-service credentials read from the process environment.

use std::env;
use std::fmt;

use tracing::{debug, warn};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ORGANIZATION_VAR: &str = "OPENAI_ORG_ID";

/// Credentials handed to the completion client at construction.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token. May be empty; the service then rejects the request.
    pub api_key: String,
    /// Organization identifier, sent only when present.
    pub organization: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, organization: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            organization,
        }
    }

    /// Read credentials once from the environment, after loading `.env` from
    /// the working directory if one exists.
    ///
    /// Missing values are not an error here.
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        if api_key.trim().is_empty() {
            warn!(var = API_KEY_VAR, "api key is not set; requests will be rejected");
        }
        let organization = lookup(ORGANIZATION_VAR).filter(|org| !org.trim().is_empty());
        Self {
            api_key,
            organization,
        }
    }
}

// Keep secrets out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("organization", &self.organization)
            .finish()
    }
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(%err, "failed to load .env"),
    }
}
