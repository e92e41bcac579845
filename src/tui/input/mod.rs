//! Mode-specific key handling

use crate::app::{Actions, App, Mode};
use crate::config::Action;
use ratatui::crossterm::event::{KeyCode, KeyModifiers};

/// Handle a key event based on the current mode
///
/// Overlays take their own keys; only normal mode goes through the
/// configured bindings.
pub fn handle_key_event(
    app: &mut App,
    action_handler: Actions,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match &app.mode {
        Mode::Confirming(_) => match code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                action_handler.handle_action(app, Action::Confirm);
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => action_handler.cancel_confirm(app),
            _ => {}
        },
        Mode::Help => app.exit_mode(),
        Mode::Error(_) | Mode::Success(_) => {
            app.sync = None;
            app.exit_mode();
        }
        // Workers report back through the event channel; nothing to do until then
        Mode::Syncing | Mode::Running(_) => {}
        Mode::Normal => {
            if let Some(action) = app.config.keys.get_action(code, modifiers) {
                action_handler.handle_action(app, action);
            }
        }
    }
}
