//! Test-only helpers: scripted completion service, scripted operator and a
//! throwaway target file.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::io::completion::{CompletionRequest, Completer};
use crate::io::console::Console;

type Hook = Box<dyn FnOnce()>;

/// Completer that replays canned responses in order and records every request.
pub struct ScriptedCompleter {
    responses: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<CompletionRequest>>,
    hook: RefCell<Option<(usize, Hook)>>,
}

impl ScriptedCompleter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            requests: RefCell::new(Vec::new()),
            hook: RefCell::new(None),
        }
    }

    /// Run `hook` when the `call`-th request (1-based) arrives, before answering it.
    pub fn on_call(self, call: usize, hook: impl FnOnce() + 'static) -> Self {
        *self.hook.borrow_mut() = Some((call, Box::new(hook)));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.borrow().clone()
    }
}

impl Completer for ScriptedCompleter {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        request.validate()?;
        self.requests.borrow_mut().push(request.clone());
        let call = self.requests.borrow().len();

        let due = matches!(&*self.hook.borrow(), Some((at, _)) if *at == call);
        if due {
            if let Some((_, hook)) = self.hook.borrow_mut().take() {
                hook();
            }
        }

        match self.responses.borrow_mut().pop_front() {
            Some(response) => Ok(response),
            None => bail!("no scripted response for request {call}"),
        }
    }
}

/// Console that answers from a script and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    /// Questions asked, in order.
    pub asked: Vec<String>,
    /// Status lines printed, in order.
    pub said: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, line: &str) {
        self.said.push(line.to_string());
    }
}

/// A file in its own temp directory, removed on drop.
pub struct TargetFile {
    _dir: TempDir,
    path: PathBuf,
}

impl TargetFile {
    pub fn new(name: &str, contents: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let path = dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).with_context(|| format!("read {}", self.path.display()))
    }
}
