//! Prompt rendering for the three completion calls of a session.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::core::outcome::CONVERGENCE_SENTINEL;
use crate::core::types::{Mode, PromptContext};

const CLASSIFY_TEMPLATE: &str = include_str!("prompts/classify.md");
const DESCRIBE_TEMPLATE: &str = include_str!("prompts/describe.md");
const IMPROVE_TEMPLATE: &str = include_str!("prompts/improve.md");

/// Template engine wrapper around minijinja.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("classify", CLASSIFY_TEMPLATE)
            .context("parse classify template")?;
        env.add_template("describe", DESCRIBE_TEMPLATE)
            .context("parse describe template")?;
        env.add_template("improve", IMPROVE_TEMPLATE)
            .context("parse improve template")?;
        Ok(Self { env })
    }

    /// Ask for the language of `code`, and nothing else.
    pub fn render_classify(&self, code: &str) -> Result<String> {
        let template = self.env.get_template("classify")?;
        Ok(template.render(context! { code => code })?)
    }

    /// Ask for a short purpose description plus one improvement idea.
    pub fn render_describe(&self, language: &str, code: &str) -> Result<String> {
        let template = self.env.get_template("describe")?;
        Ok(template.render(context! {
            fence_tag => fence_tag(language),
            code => code,
        })?)
    }

    /// Ask for an improved version of `code`, or the convergence sentinel.
    pub fn render_improve(&self, mode: Mode, prompt: &PromptContext, code: &str) -> Result<String> {
        let template = self.env.get_template("improve")?;
        Ok(template.render(context! {
            language => prompt.language.as_str(),
            fence_tag => fence_tag(&prompt.language),
            purpose => prompt.purpose.trim(),
            instruction => mode.instruction(),
            sentinel => CONVERGENCE_SENTINEL,
            code => code,
        })?)
    }
}

/// Language name squeezed into a fence info string (whitespace removed).
fn fence_tag(language: &str) -> String {
    language.chars().filter(|c| !c.is_whitespace()).collect()
}
