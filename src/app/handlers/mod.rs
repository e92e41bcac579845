//! Action handlers for the application
//!
//! This module contains the `Actions` struct and all action handlers,
//! organized into focused submodules by domain.

mod resolver;
mod sync;

use crate::config::Action;
use anyhow::Result;
use tracing::{debug, warn};

use super::event::Background;
use super::state::{App, ConfirmAction, Mode};

/// Lines moved per scroll action
const SCROLL_STEP: isize = 5;

/// Handler for application actions
///
/// Every failure is turned into an error modal here; nothing a key press
/// does can end the event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actions;

impl Actions {
    /// Create a new action handler
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Handle a keybinding action
    pub fn handle_action(self, app: &mut App, action: Action) {
        debug!(?action, mode = ?app.mode, "Handling action");
        if let Err(e) = self.dispatch(app, action) {
            warn!(?action, error = %e, "Action failed");
            app.show_error(format!("{e:#}"));
        }
    }

    fn dispatch(self, app: &mut App, action: Action) -> Result<()> {
        match action {
            Action::NextConflict => match app.session.as_mut() {
                Some(session) => {
                    session.next();
                    app.reset_scroll();
                }
                None => app.select_next_file(),
            },
            Action::PrevConflict => match app.session.as_mut() {
                Some(session) => {
                    session.prev();
                    app.reset_scroll();
                }
                None => app.select_prev_file(),
            },
            Action::NextUnresolved => Self::next_unresolved(app),
            Action::AcceptOurs => Self::resolve_current(app, |session, index| {
                session.accept_ours(index)
            })?,
            Action::AcceptTheirs => Self::resolve_current(app, |session, index| {
                session.accept_theirs(index)
            })?,
            Action::AcceptBoth => Self::resolve_current(app, |session, index| {
                session.accept_both(index)
            })?,
            Action::Unresolve => Self::resolve_current(app, |session, index| {
                session.unresolve(index)
            })?,
            Action::AcceptAllOurs => Self::resolve_all(app, true),
            Action::AcceptAllTheirs => Self::resolve_all(app, false),
            Action::Save => Self::save_file(app, false)?,
            Action::Open => {
                if app.session.is_none() {
                    Self::open_selected(app)?;
                }
            }
            Action::Sync => {
                if app.session.is_none() {
                    Self::request_sync(app)?;
                }
            }
            Action::ScrollUp => app.scroll_up(SCROLL_STEP),
            Action::ScrollDown => app.scroll_down(SCROLL_STEP),
            Action::Help => app.enter_mode(Mode::Help),
            Action::Quit => {
                if app.has_unsaved_resolutions() {
                    app.enter_mode(Mode::Confirming(ConfirmAction::Quit));
                } else {
                    app.should_quit = true;
                }
            }
            Action::Cancel => {
                if app.has_unsaved_resolutions() {
                    app.enter_mode(Mode::Confirming(ConfirmAction::Discard));
                } else if app.session.is_some() {
                    Self::close_file(app)?;
                }
            }
            Action::Confirm => self.handle_confirm(app)?,
        }
        Ok(())
    }

    /// Carry out the pending confirmation
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmed operation fails to start
    fn handle_confirm(self, app: &mut App) -> Result<()> {
        let Mode::Confirming(action) = app.mode.clone() else {
            return Ok(());
        };
        app.exit_mode();

        match action {
            ConfirmAction::SavePartial { .. } => Self::save_file(app, true),
            ConfirmAction::FollowUp(follow_up) => {
                Self::start_follow_up(app, follow_up);
                Ok(())
            }
            ConfirmAction::Sync { main, feature } => Self::start_sync(app, main, feature),
            ConfirmAction::Discard => Self::close_file(app),
            ConfirmAction::Quit => {
                app.should_quit = true;
                Ok(())
            }
        }
    }

    /// Decline the pending confirmation
    pub fn cancel_confirm(self, app: &mut App) {
        if let Mode::Confirming(ConfirmAction::FollowUp(follow_up)) = &app.mode {
            app.set_status(format!("Skipped: {}", follow_up.label().to_lowercase()));
        }
        app.exit_mode();
    }

    /// Apply a result delivered by a worker thread
    pub fn handle_background(self, app: &mut App, message: Background) {
        match message {
            Background::Sync(progress) => Self::sync_progress(app, progress),
            Background::SyncDone(result) => Self::finish_sync(app, result),
            Background::FollowUpDone { follow_up, result } => {
                Self::finish_follow_up(app, follow_up, result);
            }
        }
    }
}
