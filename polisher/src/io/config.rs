//! Polisher configuration stored in `polisher.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::retry::RetryPolicy;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "polisher.toml";

/// Polisher configuration (TOML).
///
/// Missing fields default to the values the tool ships with. Credentials are
/// never stored here; see [`crate::io::credentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolisherConfig {
    /// Model name sent with every completion request.
    pub model: String,

    /// Chat-completions endpoint URL.
    pub endpoint: String,

    /// Per-request wall-clock timeout in seconds.
    pub request_timeout_secs: u64,

    /// Compress source text (whitespace deletion + stemming) before prompting.
    pub normalize: bool,

    /// Upper bound on improve rounds in recursive sessions. `0` means unbounded.
    pub max_rounds: u32,

    pub retry: RetryConfig,

    /// Sampling for the language classification prompt.
    pub classify: SamplingConfig,

    /// Sampling for the purpose description prompt.
    pub describe: SamplingConfig,

    /// Sampling for the improve prompt.
    pub improve: SamplingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_factor: self.backoff_factor,
        }
    }
}

/// Sampling parameters for one kind of prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl SamplingConfig {
    const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::new(0.0, 2048)
    }
}

impl Default for PolisherConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            request_timeout_secs: 120,
            normalize: true,
            max_rounds: 0,
            retry: RetryConfig::default(),
            classify: SamplingConfig::new(0.0, 25),
            describe: SamplingConfig::new(0.0, 250),
            improve: SamplingConfig::new(0.0, 2048),
        }
    }
}

impl PolisherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must be non-empty"));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(anyhow!("endpoint must be an http(s) URL"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(anyhow!("retry.backoff_factor must be >= 1.0"));
        }
        for (name, sampling) in [
            ("classify", &self.classify),
            ("describe", &self.describe),
            ("improve", &self.improve),
        ] {
            if !(0.0..=1.0).contains(&sampling.temperature) {
                return Err(anyhow!("{name}.temperature must be within [0, 1]"));
            }
            if sampling.max_tokens == 0 {
                return Err(anyhow!("{name}.max_tokens must be > 0"));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PolisherConfig::default()`.
pub fn load_config(path: &Path) -> Result<PolisherConfig> {
    if !path.exists() {
        let cfg = PolisherConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PolisherConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PolisherConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, PolisherConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("polisher.toml");
        let cfg = PolisherConfig {
            normalize: false,
            max_rounds: 3,
            ..PolisherConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("polisher.toml");
        fs::write(&path, "model = \"gpt-4o\"\n[improve]\ntemperature = 0.2\nmax_tokens = 4096\n")
            .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.improve, SamplingConfig::new(0.2, 4096));
        assert_eq!(cfg.classify.max_tokens, 25);
        assert!(cfg.normalize);
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let mut cfg = PolisherConfig::default();
        cfg.describe.temperature = 1.5;
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("describe.temperature"));
    }

    #[test]
    fn rejects_zero_timeout_and_zero_tokens() {
        let cfg = PolisherConfig {
            request_timeout_secs: 0,
            ..PolisherConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = PolisherConfig::default();
        cfg.classify.max_tokens = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn retry_config_builds_policy() {
        let policy = RetryConfig::default().policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }
}
