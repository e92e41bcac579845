//! Writing a session back to disk, staging it, and the follow-up git step

use std::path::PathBuf;

use tracing::{info, warn};

use super::ResolverSession;
use crate::error::{Error, Result};
use crate::git::{Client, Executor, RunOptions};

/// The git step offered once a resolved file is staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// A rebase is stopped on this conflict: `rebase --continue`
    ContinueRebase,
    /// A merge is waiting: `commit --no-edit`
    CommitMerge,
}

impl FollowUp {
    /// Which follow-up applies to the repository's current state
    ///
    /// A stopped rebase takes priority over a pending merge.
    #[must_use]
    pub fn detect<E: Executor>(git: &Client<E>) -> Option<Self> {
        if git.rebase_in_progress() {
            Some(Self::ContinueRebase)
        } else if git.merge_in_progress() {
            Some(Self::CommitMerge)
        } else {
            None
        }
    }

    /// Question shown to the user
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::ContinueRebase => "Rebase in progress. Run 'git rebase --continue'?",
            Self::CommitMerge => "Merge in progress. Commit the merge now?",
        }
    }

    /// Short label used in logs and error messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ContinueRebase => "Continue rebase",
            Self::CommitMerge => "Commit merge",
        }
    }

    /// Arguments passed to git
    #[must_use]
    pub fn args(self) -> Vec<String> {
        let args: &[&str] = match self {
            Self::ContinueRebase => &["rebase", "--continue"],
            Self::CommitMerge => &["commit", "--no-edit"],
        };
        args.iter().map(|arg| (*arg).to_string()).collect()
    }

    /// Run options; `rebase --continue` must never open an editor
    #[must_use]
    pub fn options(self) -> RunOptions {
        match self {
            Self::ContinueRebase => RunOptions::default().with_env("GIT_EDITOR", "true"),
            Self::CommitMerge => RunOptions::default(),
        }
    }

    /// Run the follow-up and return git's output
    ///
    /// # Errors
    ///
    /// Returns [`Error::Process`] if git rejects the step
    pub fn run<E: Executor>(self, git: &Client<E>) -> Result<Vec<String>> {
        let args = self.args();
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        info!(follow_up = self.label(), "Running follow-up");
        git.execute(self.label(), &argv, &self.options())
    }
}

/// What happened after the file was written
#[derive(Debug)]
pub struct SaveReport {
    /// File that was written
    pub path: PathBuf,
    /// Conflicts left unresolved in the written file
    pub unresolved: usize,
    /// Set when `git add` failed; the write itself is kept
    pub stage_error: Option<Error>,
    /// Step to offer next, only when the file is fully resolved and staged
    pub follow_up: Option<FollowUp>,
}

/// Result of a save request
#[derive(Debug)]
pub enum SaveOutcome {
    /// Unresolved conflicts remain; ask before writing markers back out
    NeedsConfirmation {
        /// How many conflicts are still open
        unresolved: usize,
    },
    /// The file was written
    Saved(SaveReport),
}

/// Write the merged file and stage it
///
/// With unresolved hunks and `confirmed == false` nothing is written. A
/// staging failure is reported in the [`SaveReport`] rather than returned so
/// the caller can still tell the user the file was saved.
///
/// # Errors
///
/// Returns [`Error::Write`] if the file cannot be written
pub fn save<E: Executor>(
    session: &ResolverSession,
    git: &Client<E>,
    confirmed: bool,
) -> Result<SaveOutcome> {
    let unresolved = session.unresolved_count();
    if unresolved > 0 && !confirmed {
        return Ok(SaveOutcome::NeedsConfirmation { unresolved });
    }

    session.write()?;

    let path = session.path().to_path_buf();
    let stage_error = match path.to_str() {
        Some(pathspec) => git.add(pathspec).err(),
        None => Some(Error::Validation(format!(
            "Cannot stage {}: path is not UTF-8",
            path.display()
        ))),
    };
    let follow_up = match &stage_error {
        Some(e) => {
            warn!(path = %path.display(), error = %e, "Saved but could not stage");
            None
        }
        None => {
            info!(path = %path.display(), unresolved, "Staged resolved file");
            // Continuing with markers still in the file would commit them
            (unresolved == 0).then(|| FollowUp::detect(git)).flatten()
        }
    };

    Ok(SaveOutcome::Saved(SaveReport {
        path,
        unresolved,
        stage_error,
        follow_up,
    }))
}
