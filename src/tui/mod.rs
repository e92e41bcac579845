//! Terminal user interface

mod input;
mod render;

use anyhow::Result;
use ratatui::crossterm::{
    event::KeyEventKind,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tracing::{debug, info};

use crate::app::{Actions, App, Event, Handler};

/// Run the TUI application until the user quits
///
/// `events` must be the handler whose sender was given to `app`, so worker
/// results reach this loop.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to
pub fn run(mut app: App, events: &Handler) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!(root = %app.root.display(), "TUI started");

    let result = run_loop(&mut terminal, &mut app, events, Actions::new());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &Handler,
    action_handler: Actions,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        match events.next()? {
            Event::Tick | Event::Resize(_, _) => {}
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    input::handle_key_event(app, action_handler, key.code, key.modifiers);
                }
            }
            Event::Background(message) => {
                debug!(?message, "Background result");
                action_handler.handle_background(app, message);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
