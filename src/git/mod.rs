//! Git access: repository discovery plus the CLI executor and its typed wrapper

mod client;
pub mod exec;
#[cfg(test)]
pub(crate) mod fake;

pub use client::{Client, Upstream};
pub use exec::{Executor, GitCli, Output, RunOptions, SharedExecutor};

use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open a git repository at the given path
///
/// # Errors
///
/// Returns an error if the path is not a git repository
pub fn open_repository(path: &Path) -> Result<Repository> {
    Repository::discover(path)
        .with_context(|| format!("Failed to open git repository at {}", path.display()))
}

/// Get the root of the git repository containing the given path
///
/// # Errors
///
/// Returns an error if the path is not inside a git repository
pub fn repository_root(path: &Path) -> Result<PathBuf> {
    let repo = open_repository(path)?;
    repo.workdir()
        .map(Path::to_path_buf)
        .context("Repository has no working directory")
}

/// A git client rooted at the work tree containing `path`
///
/// Commands run from the repository root so paths reported by git (such as
/// the conflicted-file list) resolve against it.
///
/// # Errors
///
/// Returns an error if `path` is not inside a non-bare repository
pub fn client_for(path: &Path) -> Result<Client<SharedExecutor>> {
    let root = repository_root(path)?;
    let executor: SharedExecutor = Arc::new(GitCli::new(root));
    Ok(Client::new(executor))
}
