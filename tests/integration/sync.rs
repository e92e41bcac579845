//! Sync workflow against real repositories

use crate::common::{TestFixture, git_command, git_in};
use rejoin::Error;
use rejoin::workflow::{self, Progress};

#[test]
fn test_sync_without_upstreams_fast_forwards_main() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_cleanly()?;
    let git = fixture.client()?;

    let summary = workflow::run(&git, "main", "feature", &[])?;

    assert_eq!(summary.steps, 5);
    assert_eq!(summary.to_string(), "Merged feature into main (5 steps)");
    assert_eq!(fixture.rev("main")?, fixture.rev("feature")?);
    assert_eq!(git.current_branch().as_deref(), Some("main"));
    assert_eq!(fixture.read("feature.txt")?, "new feature\n");
    assert_eq!(fixture.read("main.txt")?, "main work\n");
    Ok(())
}

#[test]
fn test_sync_reports_each_step() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_cleanly()?;
    let git = fixture.client()?;

    let mut started = Vec::new();
    workflow::run_with_progress(&git, "main", "feature", &[], |progress| {
        if let Progress::StepStarted { label, .. } = progress {
            started.push(label);
        }
    })?;

    assert_eq!(
        started,
        vec![
            "Checkout main",
            "Checkout feature",
            "Rebase feature onto main",
            "Checkout main",
            "Merge feature into main",
        ]
    );
    Ok(())
}

#[test]
fn test_sync_stops_at_rebase_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_with_conflict()?;
    let main_before = fixture.rev("main")?;
    let git = fixture.client()?;

    let Err(Error::Workflow { step, label, lines }) = workflow::run(&git, "main", "feature", &[])
    else {
        return Err("expected the rebase step to fail".into());
    };

    assert_eq!(step, 3);
    assert_eq!(label, "Rebase feature onto main");
    assert!(lines.iter().any(|line| line.contains("CONFLICT")));
    assert!(git.rebase_in_progress());
    assert_eq!(git.conflicted_files()?, vec!["shared.txt".to_string()]);
    assert_eq!(fixture.rev("main")?, main_before);
    Ok(())
}

#[test]
fn test_sync_rejects_missing_branch_without_touching_head()
-> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    let git = fixture.client()?;

    let result = workflow::run(&git, "main", "does-not-exist", &[]);

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(git.current_branch().as_deref(), Some("main"));
    Ok(())
}

#[test]
fn test_sync_passes_rebase_args() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_cleanly()?;
    let git = fixture.client()?;

    let bogus = vec!["--no-such-rebase-flag".to_string()];
    let Err(Error::Workflow { step, .. }) = workflow::run(&git, "main", "feature", &bogus) else {
        return Err("expected the rebase to reject the flag".into());
    };
    assert_eq!(step, 3);
    Ok(())
}

#[test]
fn test_sync_pulls_configured_upstreams() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_cleanly()?;

    // Publish both branches to a bare remote and track them
    let remote = fixture.scratch("remote.git");
    let remote_str = remote.to_string_lossy().to_string();
    git_command(
        &fixture.scratch(""),
        &["clone", "-q", "--bare", &fixture.repo_path.to_string_lossy(), &remote_str],
    )?;
    fixture.git(&["remote", "add", "origin", &remote_str])?;
    fixture.git(&["fetch", "-q", "origin"])?;
    fixture.git(&["branch", "-q", "--set-upstream-to=origin/main", "main"])?;
    fixture.git(&["branch", "-q", "--set-upstream-to=origin/feature", "feature"])?;

    // Someone else pushes to main
    let other = fixture.scratch("other");
    git_command(
        &fixture.scratch(""),
        &["clone", "-q", &remote_str, &other.to_string_lossy()],
    )?;
    git_in(&other, &["checkout", "-q", "main"])?;
    std::fs::write(other.join("upstream.txt"), "from upstream\n")?;
    git_in(&other, &["add", "upstream.txt"])?;
    git_in(&other, &["commit", "-q", "-m", "Upstream work"])?;
    git_in(&other, &["push", "-q", "origin", "main"])?;

    let git = fixture.client()?;
    let summary = workflow::run(&git, "main", "feature", &[])?;

    assert_eq!(summary.steps, 7);
    assert_eq!(fixture.read("upstream.txt")?, "from upstream\n");
    assert_eq!(fixture.read("feature.txt")?, "new feature\n");
    Ok(())
}
