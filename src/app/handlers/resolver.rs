//! Opening, resolving and saving conflicted files.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::app::{App, Background, ConfirmAction, Mode};
use crate::conflict::{self, FollowUp, OpenOutcome, ResolverSession, SaveOutcome};
use crate::error;
use crate::git::exec;

use super::Actions;

impl Actions {
    /// Reload the list of conflicted files from the index
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot list unmerged paths
    pub fn refresh_files(app: &mut App) -> Result<()> {
        app.files = app
            .git
            .conflicted_files()
            .context("Failed to list conflicted files")?;
        app.selected_file = app.selected_file.min(app.files.len().saturating_sub(1));
        debug!(count = app.files.len(), "Refreshed conflicted files");
        Ok(())
    }

    /// Open the file selected in the picker
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn open_selected(app: &mut App) -> Result<()> {
        let Some(relative) = app.selected_path() else {
            app.set_status("No conflicted files");
            return Ok(());
        };
        let path = app.root.join(relative);
        Self::open_path(app, &path)
    }

    /// Open a file for resolution
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn open_path(app: &mut App, path: &Path) -> Result<()> {
        let shown = app.display_path(path).display().to_string();
        match ResolverSession::open(path, app.config.parse_mode())
            .with_context(|| format!("Cannot open {shown}"))?
        {
            OpenOutcome::Ready(session) => {
                info!(path = %shown, hunks = session.hunks().len(), "Resolving file");
                app.set_status(format!(
                    "{shown}: {} conflict(s)",
                    session.hunks().len()
                ));
                app.session = Some(session);
                app.reset_scroll();
            }
            OpenOutcome::NoConflicts => {
                app.set_status(format!("{shown} has no conflict markers"));
            }
        }
        Ok(())
    }

    /// Close the open file without saving
    ///
    /// # Errors
    ///
    /// Returns an error if the file list cannot be refreshed
    pub fn close_file(app: &mut App) -> Result<()> {
        app.session = None;
        app.reset_scroll();
        app.clear_status();
        Self::refresh_files(app)
    }

    pub(super) fn resolve_current<F>(app: &mut App, resolve: F) -> Result<()>
    where
        F: FnOnce(&mut ResolverSession, usize) -> error::Result<()>,
    {
        let Some(session) = app.session.as_mut() else {
            return Ok(());
        };
        let index = session.cursor();
        resolve(session, index)?;
        let remaining = session.unresolved_count();
        app.set_status(if remaining == 0 {
            "All conflicts resolved. Save with w".to_string()
        } else {
            format!("{remaining} unresolved")
        });
        Ok(())
    }

    pub(super) fn resolve_all(app: &mut App, ours: bool) {
        let Some(session) = app.session.as_mut() else {
            return;
        };
        if ours {
            session.accept_all_ours();
        } else {
            session.accept_all_theirs();
        }
        app.set_status(format!(
            "Took {} for every conflict",
            if ours { "local" } else { "incoming" }
        ));
    }

    pub(super) fn next_unresolved(app: &mut App) {
        let Some(session) = app.session.as_mut() else {
            return;
        };
        if session.next_unresolved() {
            app.reset_scroll();
        } else if session.is_fully_resolved() {
            app.set_status("All conflicts resolved");
        }
    }

    /// Save the open file, asking first when conflicts remain
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_file(app: &mut App, confirmed: bool) -> Result<()> {
        let Some(session) = app.session.as_ref() else {
            return Ok(());
        };
        let shown = app.display_path(session.path()).display().to_string();

        let report = match conflict::save(session, &app.git, confirmed)? {
            SaveOutcome::NeedsConfirmation { unresolved } => {
                app.enter_mode(Mode::Confirming(ConfirmAction::SavePartial { unresolved }));
                return Ok(());
            }
            SaveOutcome::Saved(report) => report,
        };

        app.session = None;
        app.reset_scroll();
        Self::refresh_files(app)?;

        if let Some(e) = report.stage_error {
            app.show_error(format!("Saved {shown}, but staging failed:\n{e}"));
        } else if let Some(follow_up) = report.follow_up {
            app.set_status(format!("Saved and staged {shown}"));
            app.enter_mode(Mode::Confirming(ConfirmAction::FollowUp(follow_up)));
        } else if report.unresolved > 0 {
            app.set_status(format!(
                "Saved {shown} with {} unresolved conflict(s)",
                report.unresolved
            ));
        } else {
            app.set_status(format!("Saved and staged {shown}"));
        }
        Ok(())
    }

    /// Run a follow-up on a worker thread
    pub fn start_follow_up(app: &mut App, follow_up: FollowUp) {
        info!(follow_up = follow_up.label(), "Starting follow-up");
        app.enter_mode(Mode::Running(follow_up));
        exec::spawn(
            app.git.executor().clone(),
            follow_up.args(),
            follow_up.options(),
            app.background_sender(),
            move |result| Background::FollowUpDone {
                follow_up,
                result: result.and_then(|output| output.into_result(follow_up.label())),
            },
        );
    }

    /// Apply a finished follow-up
    pub(super) fn finish_follow_up(
        app: &mut App,
        follow_up: FollowUp,
        result: error::Result<Vec<String>>,
    ) {
        let refreshed = Self::refresh_files(app);
        match (result, refreshed) {
            (Ok(_), Ok(())) => {
                let message = match follow_up {
                    FollowUp::ContinueRebase => "Rebase continued",
                    FollowUp::CommitMerge => "Merge committed",
                };
                info!(follow_up = follow_up.label(), "Follow-up finished");
                if app.files.is_empty() {
                    app.show_success(message);
                } else {
                    app.show_error(format!(
                        "{message}, but {} file(s) now have conflicts",
                        app.files.len()
                    ));
                }
            }
            (Err(e), _) => app.show_error(e.to_string()),
            (Ok(_), Err(e)) => app.show_error(format!("{e:#}")),
        }
    }
}
