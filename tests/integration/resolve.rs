//! Resolve, save, stage and follow up against real conflicts

use crate::common::TestFixture;
use pretty_assertions::assert_eq;
use rejoin::conflict::{
    self, FollowUp, OpenOutcome, ParseMode, ResolverSession, SaveOutcome,
};
use rejoin::workflow;

fn open_shared(fixture: &TestFixture) -> Result<ResolverSession, Box<dyn std::error::Error>> {
    match ResolverSession::open(fixture.repo_path.join("shared.txt"), ParseMode::Strict)? {
        OpenOutcome::Ready(session) => Ok(session),
        OpenOutcome::NoConflicts => Err("expected conflict markers in shared.txt".into()),
    }
}

#[test]
fn test_resolve_rebase_conflict_and_finish_sync() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_with_conflict()?;
    let git = fixture.client()?;
    assert!(workflow::run(&git, "main", "feature", &[]).is_err());

    let mut session = open_shared(&fixture)?;
    assert_eq!(session.hunks().len(), 1);
    let hunk = session.current().ok_or("no hunk")?;
    // During a rebase HEAD is the branch being rebased onto
    assert_eq!(hunk.ours(), ["main beta".to_string()]);
    assert_eq!(hunk.theirs(), ["feature beta".to_string()]);

    session.accept_theirs(0)?;
    let SaveOutcome::Saved(report) = conflict::save(&session, &git, false)? else {
        return Err("a fully resolved file saves without asking".into());
    };
    assert!(report.stage_error.is_none());
    assert_eq!(report.follow_up, Some(FollowUp::ContinueRebase));
    assert_eq!(fixture.read("shared.txt")?, "alpha\nfeature beta\ngamma\n");
    assert!(git.conflicted_files()?.is_empty());

    FollowUp::ContinueRebase.run(&git)?;
    assert!(!git.rebase_in_progress());

    let summary = workflow::run(&git, "main", "feature", &[])?;
    assert_eq!(summary.steps, 5);
    assert_eq!(fixture.read("shared.txt")?, "alpha\nfeature beta\ngamma\n");
    assert_eq!(fixture.rev("main")?, fixture.rev("feature")?);
    Ok(())
}

#[test]
fn test_merge_after_finished_rebase_offers_commit() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_with_conflict()?;
    let git = fixture.client()?;
    assert!(workflow::run(&git, "main", "feature", &[]).is_err());

    let mut session = open_shared(&fixture)?;
    session.accept_theirs(0)?;
    conflict::save(&session, &git, false)?;
    FollowUp::ContinueRebase.run(&git)?;
    assert!(!git.rebase_in_progress());

    // A later merge stops on a conflict of its own
    fixture.git(&["checkout", "-q", "-b", "hotfix"])?;
    fixture.commit_file("shared.txt", "alpha\nfeature beta\nhotfix gamma\n", "Hotfix gamma")?;
    fixture.git(&["checkout", "-q", "feature"])?;
    fixture.commit_file("shared.txt", "alpha\nfeature beta\nfeature gamma\n", "Feature gamma")?;
    assert!(!fixture.git_succeeds(&["merge", "hotfix"])?);
    assert!(!git.rebase_in_progress());
    assert!(git.merge_in_progress());

    let mut session = open_shared(&fixture)?;
    session.accept_ours(0)?;
    let SaveOutcome::Saved(report) = conflict::save(&session, &git, false)? else {
        return Err("a fully resolved file saves without asking".into());
    };
    assert_eq!(report.follow_up, Some(FollowUp::CommitMerge));
    FollowUp::CommitMerge.run(&git)?;
    assert!(!git.merge_in_progress());
    assert_eq!(
        fixture.read("shared.txt")?,
        "alpha\nfeature beta\nfeature gamma\n"
    );
    Ok(())
}

#[test]
fn test_resolve_merge_conflict_and_commit() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_with_conflict()?;
    fixture.git(&["checkout", "-q", "main"])?;
    assert!(!fixture.git_succeeds(&["merge", "feature"])?);
    let git = fixture.client()?;
    assert!(git.merge_in_progress());
    assert!(!git.rebase_in_progress());

    let mut session = open_shared(&fixture)?;
    session.accept_both(0)?;
    let SaveOutcome::Saved(report) = conflict::save(&session, &git, false)? else {
        return Err("a fully resolved file saves without asking".into());
    };
    assert_eq!(report.follow_up, Some(FollowUp::CommitMerge));
    assert_eq!(
        fixture.read("shared.txt")?,
        "alpha\nmain beta\nfeature beta\ngamma\n"
    );

    FollowUp::CommitMerge.run(&git)?;
    assert!(!git.merge_in_progress());
    let parents = fixture.git(&["rev-list", "--parents", "-n", "1", "HEAD"])?;
    assert_eq!(parents.split_whitespace().count(), 3);
    Ok(())
}

#[test]
fn test_partial_save_needs_confirmation_and_never_offers_follow_up()
-> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.diverge_with_conflict()?;
    fixture.git(&["checkout", "-q", "main"])?;
    assert!(!fixture.git_succeeds(&["merge", "feature"])?);
    let git = fixture.client()?;
    let original = fixture.read("shared.txt")?;

    let session = open_shared(&fixture)?;
    let SaveOutcome::NeedsConfirmation { unresolved } = conflict::save(&session, &git, false)?
    else {
        return Err("unresolved conflicts must ask first".into());
    };
    assert_eq!(unresolved, 1);
    assert_eq!(fixture.read("shared.txt")?, original);

    let SaveOutcome::Saved(report) = conflict::save(&session, &git, true)? else {
        return Err("confirmed save writes".into());
    };
    assert_eq!(report.unresolved, 1);
    assert_eq!(report.follow_up, None);
    assert_eq!(fixture.read("shared.txt")?, original);
    assert!(git.merge_in_progress());
    Ok(())
}

#[test]
fn test_diff3_conflict_keeps_base_until_resolved() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.git(&["config", "merge.conflictStyle", "diff3"])?;
    fixture.diverge_with_conflict()?;
    fixture.git(&["checkout", "-q", "main"])?;
    assert!(!fixture.git_succeeds(&["merge", "feature"])?);
    let original = fixture.read("shared.txt")?;

    let mut session = open_shared(&fixture)?;
    let hunk = session.current().ok_or("no hunk")?;
    assert_eq!(hunk.base(), Some(&["beta".to_string()][..]));
    assert_eq!(String::from_utf8(session.render_bytes())?, original);

    session.accept_all_ours();
    assert_eq!(session.build_result(), vec!["alpha", "main beta", "gamma"]);
    Ok(())
}

#[test]
fn test_crlf_file_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestFixture::new()?;
    fixture.write(
        "windows.txt",
        "one\r\n<<<<<<< HEAD\r\nmine\r\n=======\r\ntheirs\r\n>>>>>>> other\r\ntwo\r\n",
    )?;
    let OpenOutcome::Ready(mut session) =
        ResolverSession::open(fixture.repo_path.join("windows.txt"), ParseMode::Lenient)?
    else {
        return Err("expected a conflict".into());
    };
    session.accept_ours(0)?;
    session.write()?;
    assert_eq!(fixture.read("windows.txt")?, "one\r\nmine\r\ntwo\r\n");
    Ok(())
}
