//! Typed git calls on top of an [`Executor`]

use std::path::Path;

use tracing::debug;

use super::exec::{Executor, RunOptions};
use crate::error::Result;

/// The remote-tracking branch configured for a local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// Remote name (e.g. "origin", or "." for a local upstream)
    pub remote: String,
    /// Branch name on the remote, without `refs/heads/`
    pub branch: String,
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// Git operations used by the resolver and the sync workflow
#[derive(Debug, Clone)]
pub struct Client<E> {
    executor: E,
}

impl<E: Executor> Client<E> {
    /// Wrap an executor
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// The underlying executor
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Run a command and turn a non-zero exit into [`crate::error::Error::Process`]
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot start or exits unsuccessfully
    pub fn execute(&self, label: &str, args: &[&str], options: &RunOptions) -> Result<Vec<String>> {
        self.executor.run(args, options)?.into_result(label)
    }

    fn probe(&self, args: &[&str]) -> bool {
        match self.executor.run(args, &RunOptions::silent()) {
            Ok(output) => output.success,
            Err(e) => {
                debug!(?args, error = %e, "Probe could not run");
                false
            }
        }
    }

    fn query(&self, args: &[&str]) -> Option<String> {
        self.executor
            .run(args, &RunOptions::silent())
            .ok()
            .filter(|output| output.success)
            .and_then(|output| output.first_line().map(str::to_string))
    }

    /// Whether a local branch with this name exists
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let reference = format!("refs/heads/{name}");
        self.probe(&["show-ref", "--verify", "--quiet", &reference])
    }

    /// Whether a rebase is stopped waiting for conflict resolution
    ///
    /// Looks for git's rebase state directories. `REBASE_HEAD` is not a
    /// signal: git leaves it behind after the rebase finishes.
    #[must_use]
    pub fn rebase_in_progress(&self) -> bool {
        let args = [
            "rev-parse",
            "--path-format=absolute",
            "--git-path",
            "rebase-merge",
            "--git-path",
            "rebase-apply",
        ];
        let Ok(output) = self.executor.run(&args, &RunOptions::silent()) else {
            return false;
        };
        output.success
            && output
                .lines
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .any(|dir| Path::new(dir).is_dir())
    }

    /// Whether a merge is waiting to be committed
    #[must_use]
    pub fn merge_in_progress(&self) -> bool {
        self.probe(&["rev-parse", "-q", "--verify", "MERGE_HEAD"])
    }

    /// Name of the checked-out branch, `None` when HEAD is detached
    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        self.query(&["rev-parse", "--abbrev-ref", "HEAD"])
            .filter(|name| name != "HEAD")
    }

    /// Upstream configured for `branch`, if any
    ///
    /// Reads `branch.<name>.remote` and `branch.<name>.merge`; both must be set.
    #[must_use]
    pub fn upstream(&self, branch: &str) -> Option<Upstream> {
        let remote = self.query(&["config", "--get", &format!("branch.{branch}.remote")])?;
        let merge = self.query(&["config", "--get", &format!("branch.{branch}.merge")])?;
        let branch = merge
            .strip_prefix("refs/heads/")
            .unwrap_or(&merge)
            .to_string();
        Some(Upstream { remote, branch })
    }

    /// Paths with unmerged entries in the index, relative to the repo root
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot list the unmerged paths
    pub fn conflicted_files(&self) -> Result<Vec<String>> {
        let lines = self.execute(
            "List conflicted files",
            &["diff", "--name-only", "--diff-filter=U"],
            &RunOptions::default(),
        )?;
        let mut files: Vec<String> = lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        // An entry with several unmerged stages can be listed more than once
        files.dedup();
        Ok(files)
    }

    /// Stage a file
    ///
    /// # Errors
    ///
    /// Returns an error if `git add` fails
    pub fn add(&self, path: &str) -> Result<()> {
        self.execute(
            &format!("Stage {path}"),
            &["add", "--", path],
            &RunOptions::default(),
        )
        .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::git::Output;
    use crate::git::fake::{REBASE_DIRS, ScriptedExecutor};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upstream_strips_refs_heads() {
        let fake = ScriptedExecutor::new();
        fake.respond(
            &["config", "--get", "branch.main.remote"],
            Output::ok(["origin"]),
        );
        fake.respond(
            &["config", "--get", "branch.main.merge"],
            Output::ok(["refs/heads/main"]),
        );
        let git = Client::new(&fake);

        assert_eq!(
            git.upstream("main"),
            Some(Upstream {
                remote: "origin".to_string(),
                branch: "main".to_string(),
            })
        );
    }

    #[test]
    fn test_upstream_requires_both_keys() {
        let fake = ScriptedExecutor::new();
        fake.respond(
            &["config", "--get", "branch.topic.remote"],
            Output::ok(["origin"]),
        );
        fake.fail(&["config", "--get", "branch.topic.merge"], &[]);
        let git = Client::new(&fake);

        assert_eq!(git.upstream("topic"), None);
    }

    #[test]
    fn test_upstream_absent_when_config_empty() {
        // Unscripted calls succeed with no output
        let fake = ScriptedExecutor::new();
        let git = Client::new(&fake);
        assert_eq!(git.upstream("main"), None);
    }

    #[test]
    fn test_branch_exists_probe() {
        let fake = ScriptedExecutor::new();
        fake.fail(&["show-ref", "--verify", "--quiet", "refs/heads/gone"], &[]);
        let git = Client::new(&fake);

        assert!(git.branch_exists("main"));
        assert!(!git.branch_exists("gone"));
        assert!(!git.branch_exists(""));
        // The empty name never reaches git
        assert_eq!(fake.count(&["show-ref"]), 2);
    }

    #[test]
    fn test_in_progress_probes() -> Result<(), Box<dyn std::error::Error>> {
        let fake = ScriptedExecutor::new();
        fake.fail(&["rev-parse", "-q", "--verify", "MERGE_HEAD"], &[]);
        let git = Client::new(&fake);
        assert!(!git.rebase_in_progress());
        assert!(!git.merge_in_progress());

        let git_dir = tempfile::TempDir::new()?;
        fake.stop_rebase_in(git_dir.path())?;
        assert!(git.rebase_in_progress());
        Ok(())
    }

    #[test]
    fn test_rebase_state_paths_that_do_not_exist() -> Result<(), Box<dyn std::error::Error>> {
        let git_dir = tempfile::TempDir::new()?;
        let fake = ScriptedExecutor::new();
        fake.respond(
            REBASE_DIRS,
            Output::ok([
                git_dir.path().join("rebase-merge").to_string_lossy().to_string(),
                git_dir.path().join("rebase-apply").to_string_lossy().to_string(),
            ]),
        );
        let git = Client::new(&fake);
        assert!(!git.rebase_in_progress());
        Ok(())
    }

    #[test]
    fn test_conflicted_files_trims_and_dedups() -> Result<(), Box<dyn std::error::Error>> {
        let fake = ScriptedExecutor::new();
        fake.respond(
            &["diff", "--name-only"],
            Output::ok(["src/lib.rs", "src/lib.rs", "", "README.md "]),
        );
        let git = Client::new(&fake);

        assert_eq!(git.conflicted_files()?, vec!["src/lib.rs", "README.md"]);
        Ok(())
    }

    #[test]
    fn test_add_failure_keeps_git_output() -> Result<(), Box<dyn std::error::Error>> {
        let fake = ScriptedExecutor::new();
        fake.fail(&["add"], &["fatal: pathspec 'x' did not match any files"]);
        let git = Client::new(&fake);

        let Err(Error::Process { label, lines }) = git.add("x") else {
            return Err("Expected staging to fail".into());
        };
        assert_eq!(label, "Stage x");
        assert_eq!(lines, vec!["fatal: pathspec 'x' did not match any files"]);
        Ok(())
    }

    #[test]
    fn test_current_branch_detached() {
        let fake = ScriptedExecutor::new();
        fake.respond(&["rev-parse", "--abbrev-ref"], Output::ok(["HEAD"]));
        let git = Client::new(&fake);
        assert_eq!(git.current_branch(), None);
    }
}
