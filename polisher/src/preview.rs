//! Offline preview of what a session would send (`polisher --dry-run`).
//!
//! Renders the three prompts for a file with placeholder language and purpose,
//! without contacting the completion service or asking the operator anything.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use crate::core::normalize::prepare;
use crate::core::types::{Mode, PromptContext};
use crate::io::config::PolisherConfig;
use crate::io::prompt::PromptEngine;
use crate::io::target::read_source;

const LANGUAGE_PLACEHOLDER: &str = "<language>";
const PURPOSE_PLACEHOLDER: &str = "<purpose>";

/// Rendered prompts plus size figures for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub source_bytes: usize,
    /// Size of the code as embedded in prompts (after normalization, if enabled).
    pub embedded_bytes: usize,
    pub normalized: bool,
    pub classify: String,
    pub describe: String,
    pub improve: String,
}

pub fn build_preview(
    path: &Path,
    mode: Mode,
    prompts: &PromptEngine,
    config: &PolisherConfig,
) -> Result<Preview> {
    let source = read_source(path)?;
    let code = prepare(&source, config.normalize);
    let placeholder = PromptContext {
        language: LANGUAGE_PLACEHOLDER.to_string(),
        purpose: PURPOSE_PLACEHOLDER.to_string(),
    };
    Ok(Preview {
        source_bytes: source.len(),
        embedded_bytes: code.len(),
        normalized: config.normalize,
        classify: prompts.render_classify(&code)?,
        describe: prompts.render_describe(LANGUAGE_PLACEHOLDER, &code)?,
        improve: prompts.render_improve(mode, &placeholder, &code)?,
    })
}

impl Preview {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "preview: source_bytes={} embedded_bytes={} normalized={}",
            self.source_bytes, self.embedded_bytes, self.normalized
        );
        for (name, prompt) in [
            ("classify", &self.classify),
            ("describe", &self.describe),
            ("improve", &self.improve),
        ] {
            let _ = writeln!(out, "\n== {name} ({} bytes) ==\n{prompt}", prompt.len());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TargetFile;

    #[test]
    fn preview_reports_sizes_and_prompts() {
        let target = TargetFile::new("main.py", "def  main():\n    return 1\n").expect("target");
        let preview = build_preview(
            target.path(),
            Mode::Refactor,
            &PromptEngine::new().expect("engine"),
            &PolisherConfig::default(),
        )
        .expect("preview");

        assert_eq!(preview.source_bytes, 26);
        assert!(preview.normalized);
        assert!(preview.embedded_bytes < preview.source_bytes);
        assert!(preview.improve.contains("task is to Refactor"));
        assert!(preview.improve.contains(LANGUAGE_PLACEHOLDER));

        let rendered = preview.render();
        assert!(rendered.starts_with("preview: source_bytes=26"));
        assert!(rendered.contains("== classify ("));
        assert!(rendered.contains("== improve ("));
    }

    #[test]
    fn preview_without_normalization_embeds_source_verbatim() {
        let target = TargetFile::new("main.py", "print( 1 )\n").expect("target");
        let config = PolisherConfig {
            normalize: false,
            ..PolisherConfig::default()
        };
        let preview = build_preview(
            target.path(),
            Mode::All,
            &PromptEngine::new().expect("engine"),
            &config,
        )
        .expect("preview");
        assert_eq!(preview.embedded_bytes, preview.source_bytes);
        assert!(preview.classify.contains("print( 1 )"));
    }
}
