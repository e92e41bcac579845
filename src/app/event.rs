//! Event handling for the TUI

use anyhow::Result;
use ratatui::crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use crate::conflict::FollowUp;
use crate::error;
use crate::workflow::{Progress, Summary};

/// Results delivered from worker threads
#[derive(Debug)]
pub enum Background {
    /// A sync step started or finished
    Sync(Progress),
    /// The sync workflow ended
    SyncDone(error::Result<Summary>),
    /// A post-save follow-up (continue rebase / commit merge) ended
    FollowUpDone {
        /// Which follow-up ran
        follow_up: FollowUp,
        /// Git's output, or the failure
        result: error::Result<Vec<String>>,
    },
}

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Terminal tick (nothing happened within the poll interval)
    Tick,
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// A worker thread finished something
    Background(Background),
}

/// Polls the terminal and drains worker results
///
/// Worker results are returned before terminal input so completions are
/// applied as soon as the loop comes around.
#[derive(Debug)]
pub struct Handler {
    tick_rate: Duration,
    sender: Sender<Background>,
    receiver: Receiver<Background>,
}

impl Handler {
    /// Create a new event handler with the given tick rate
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            tick_rate,
            sender,
            receiver,
        }
    }

    /// A sender for worker threads to report through
    #[must_use]
    pub fn sender(&self) -> Sender<Background> {
        self.sender.clone()
    }

    /// A pending worker result, if any
    #[must_use]
    pub fn try_background(&self) -> Option<Background> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            // The handler keeps its own sender, so the channel never disconnects
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Poll for the next event
    ///
    /// # Errors
    ///
    /// Returns an error if polling the terminal fails
    pub fn next(&self) -> Result<Event> {
        if let Some(message) = self.try_background() {
            return Ok(Event::Background(message));
        }

        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) => Ok(Event::Key(key)),
                CrosstermEvent::Resize(w, h) => Ok(Event::Resize(w, h)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }

    /// Get the tick rate
    #[must_use]
    pub const fn tick_rate(&self) -> Duration {
        self.tick_rate
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
