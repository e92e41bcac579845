//! Helper functions for test setup and common operations

use std::path::Path;
use std::process::Command;

/// Run git in `dir` and return trimmed stdout, failing on a non-zero exit
pub fn git_command(dir: &Path, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()?;
    if !output.status.success() {
        return Err(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        )
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run git with an explicit work tree, for secondary clones
pub fn git_in(dir: &Path, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let mut full = vec!["-c", "commit.gpgsign=false"];
    full.extend_from_slice(args);
    git_command(dir, &full)
}
