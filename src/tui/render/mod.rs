//! TUI rendering
//!
//! This module contains all rendering logic for the TUI, organized into:
//! - `colors`: Color palette definitions
//! - `main_layout`: File picker and status bar
//! - `resolver`: The three synchronized conflict panes
//! - `modals`: Modal/overlay rendering

pub mod colors;
pub mod main_layout;
pub mod modals;
pub mod resolver;

use crate::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Render the full application UI
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    match &app.session {
        Some(session) => resolver::render_resolver(frame, app, session, chunks[0]),
        None => main_layout::render_picker(frame, app, chunks[0]),
    }
    main_layout::render_status_bar(frame, app, chunks[1]);

    // Sync progress stays up under the result modal so the failed step is visible
    if let Some(sync) = &app.sync {
        modals::render_sync_overlay(frame, sync);
    }

    match &app.mode {
        Mode::Normal | Mode::Syncing => {}
        Mode::Help => modals::render_help_overlay(frame, app),
        Mode::Confirming(action) => {
            modals::render_confirm_overlay(frame, modals::confirm_lines(action));
        }
        Mode::Running(follow_up) => modals::render_running_overlay(frame, *follow_up),
        Mode::Error(message) => modals::render_error_modal(frame, message),
        Mode::Success(message) => modals::render_success_modal(frame, message),
    }
}
