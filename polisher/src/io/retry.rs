//! Retry wrapper around any [`Completer`].
//!
//! Only transient failures are retried: transport timeouts, connection
//! failures, HTTP 429 and HTTP 5xx. Everything else fails on the first attempt.

use std::thread;

use anyhow::Result;
use tracing::warn;

use crate::core::retry::RetryPolicy;
use crate::io::completion::{CompletionRequest, Completer, HttpStatusError};

pub struct RetryingCompleter<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: Completer> RetryingCompleter<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<C: Completer> Completer for RetryingCompleter<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let mut retry = 0;
        loop {
            match self.inner.complete(request) {
                Ok(text) => return Ok(text),
                Err(err) if retry < self.policy.max_retries && is_retryable(&err) => {
                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    warn!(
                        retry,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        err = %format!("{err:#}"),
                        "retrying completion request"
                    );
                    thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Whether a completion error is worth another attempt.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    if let Some(status) = err.downcast_ref::<HttpStatusError>() {
        return status.status == 429 || status.status >= 500;
    }
    if let Some(transport) = err.downcast_ref::<reqwest::Error>() {
        return transport.is_timeout() || transport.is_connect();
    }
    false
}
