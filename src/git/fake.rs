//! Scripted executor for unit tests.

use std::path::Path;

use parking_lot::Mutex;

use super::exec::{Executor, Output, RunOptions};
use crate::error::Result;

/// Arguments of the rebase state-directory lookup issued by [`super::Client`]
pub const REBASE_DIRS: &[&str] = &["rev-parse", "--path-format=absolute", "--git-path"];

/// Executor double: answers from a script and records every call
///
/// Calls matching no rule succeed with no output.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    rules: Mutex<Vec<(Vec<String>, Output)>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any call whose args start with `prefix`. Earlier rules win.
    pub fn respond(&self, prefix: &[&str], output: Output) {
        self.rules
            .lock()
            .push((prefix.iter().map(|s| (*s).to_string()).collect(), output));
    }

    pub fn fail(&self, prefix: &[&str], lines: &[&str]) {
        self.respond(prefix, Output::failed(lines.iter().copied()));
    }

    /// Make the repository look like a rebase stopped on a conflict
    ///
    /// Creates `rebase-merge` under `git_dir` and reports it from the
    /// state-directory lookup.
    pub fn stop_rebase_in(&self, git_dir: &Path) -> std::io::Result<()> {
        let state = git_dir.join("rebase-merge");
        std::fs::create_dir_all(&state)?;
        let missing = git_dir.join("rebase-apply");
        self.respond(
            REBASE_DIRS,
            Output::ok([
                state.to_string_lossy().to_string(),
                missing.to_string_lossy().to_string(),
            ]),
        );
        Ok(())
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls whose args start with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|call| starts_with(call, prefix))
            .count()
    }
}

fn starts_with(call: &[String], prefix: &[&str]) -> bool {
    call.len() >= prefix.len() && call.iter().zip(prefix).all(|(a, b)| a == b)
}

impl Executor for ScriptedExecutor {
    fn run(&self, args: &[&str], _options: &RunOptions) -> Result<Output> {
        let call: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
        self.calls.lock().push(call.clone());

        let answer = self
            .rules
            .lock()
            .iter()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                starts_with(&call, &prefix)
            })
            .map_or_else(|| Output::ok(Vec::<String>::new()), |(_, output)| output.clone());
        Ok(answer)
    }
}
