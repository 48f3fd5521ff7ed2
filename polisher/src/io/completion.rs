//! Completion client abstraction.
//!
//! The [`Completer`] trait decouples the improvement loop from the remote
//! chat-completions service. Tests use scripted completers that return
//! predetermined responses without touching the network.

use std::fmt;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::io::config::{PolisherConfig, SamplingConfig};
use crate::io::credentials::Credentials;

/// Longest slice of an error body kept in [`HttpStatusError`].
const ERROR_BODY_LIMIT_CHARS: usize = 2_000;

/// One prompt plus its sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Upper bound on generated tokens, `> 0`.
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, sampling: SamplingConfig) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            bail!("completion prompt must be non-empty");
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            bail!("temperature {} outside [0, 1]", self.temperature);
        }
        if self.max_tokens == 0 {
            bail!("max_tokens must be > 0");
        }
        Ok(())
    }
}

/// Abstraction over completion backends.
pub trait Completer {
    /// Perform one request/response exchange and return the top choice's text.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// The service answered with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "completion service returned HTTP {}: {}", self.status, self.body)
    }
}

impl std::error::Error for HttpStatusError {}

/// The service answered 2xx but the body lacks the expected structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedResponseError {
    pub reason: String,
}

impl fmt::Display for MalformedResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed completion response: {}", self.reason)
    }
}

impl std::error::Error for MalformedResponseError {}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompleter {
    client: Client,
    endpoint: String,
    model: String,
    credentials: Credentials,
}

impl ChatCompleter {
    pub fn new(config: &PolisherConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            credentials,
        })
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequestBody<'a> {
        ChatRequestBody {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

impl Completer for ChatCompleter {
    #[instrument(skip_all, fields(model = %self.model, max_tokens = request.max_tokens, prompt_bytes = request.prompt.len()))]
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        request.validate()?;

        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credentials.api_key)
            .json(&self.body(request));
        if let Some(org) = &self.credentials.organization {
            builder = builder.header("OpenAI-Organization", org);
        }

        debug!(endpoint = %self.endpoint, "sending completion request");
        let response = builder
            .send()
            .with_context(|| format!("POST {}", self.endpoint))?;
        let status = response.status();
        let text = response
            .text()
            .with_context(|| format!("read response body from {}", self.endpoint))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request failed");
            return Err(HttpStatusError {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT_CHARS).collect(),
            }
            .into());
        }

        let content = parse_completion(&text)?;
        debug!(response_bytes = content.len(), "completion received");
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a response body.
fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|err| MalformedResponseError {
        reason: err.to_string(),
    })?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| MalformedResponseError {
            reason: "no choices returned".to_string(),
        })?;
    let content = choice.message.content.ok_or_else(|| MalformedResponseError {
        reason: "first choice has no message content".to_string(),
    })?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completer() -> ChatCompleter {
        let config = PolisherConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ..PolisherConfig::default()
        };
        ChatCompleter::new(&config, Credentials::new("sk-test", None)).expect("client")
    }

    #[test]
    fn body_matches_chat_completions_shape() {
        let completer = completer();
        let request = CompletionRequest::new("What language?", SamplingConfig {
            temperature: 0.0,
            max_tokens: 25,
        });
        let body = serde_json::to_value(completer.body(&request)).expect("serialize");
        assert_eq!(
            body,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "What language?"}],
                "temperature": 0.0,
                "max_tokens": 25,
            })
        );
    }

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Rust"}},{"message":{"content":"C"}}]}"#;
        assert_eq!(parse_completion(body).expect("parse"), "Rust");
    }

    #[test]
    fn empty_choices_is_malformed() {
        let err = parse_completion(r#"{"choices":[]}"#).expect_err("malformed");
        assert!(err.downcast_ref::<MalformedResponseError>().is_some());
    }

    #[test]
    fn missing_content_is_malformed() {
        let err = parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#)
            .expect_err("malformed");
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_completion("<html>bad gateway</html>").expect_err("malformed");
        assert!(err.downcast_ref::<MalformedResponseError>().is_some());
    }

    #[test]
    fn invalid_request_fails_before_any_network_call() {
        let completer = completer();
        let request = CompletionRequest {
            prompt: "   ".to_string(),
            temperature: 0.0,
            max_tokens: 10,
        };
        let err = completer.complete(&request).expect_err("invalid");
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn request_validation_checks_sampling() {
        let mut request = CompletionRequest {
            prompt: "p".to_string(),
            temperature: 1.2,
            max_tokens: 10,
        };
        assert!(request.validate().is_err());
        request.temperature = 1.0;
        assert!(request.validate().is_ok());
        request.max_tokens = 0;
        assert!(request.validate().is_err());
    }
}
