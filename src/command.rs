//! Splitting user-supplied argument strings.

use anyhow::{Context, Result};

/// Split extra `git rebase` arguments written as one shell-style string.
///
/// Quoting follows Unix shell rules. An empty or comment-only string yields
/// no arguments.
///
/// # Errors
///
/// Returns an error if the quoting is unbalanced.
pub fn split_args(args: &str) -> Result<Vec<String>> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    shell_words::split(trimmed).with_context(|| format!("Failed to parse arguments: {trimmed}"))
}

/// Render an argv vector back into a copy-pasteable command line.
#[must_use]
pub fn join_args<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut words = vec![program];
    words.extend(args.iter().map(AsRef::as_ref));
    shell_words::join(words)
}
