//! Application state

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::config::Config;
use crate::conflict::{FollowUp, ResolverSession};
use crate::git::{Client, SharedExecutor};
use crate::workflow::Progress;

use super::event::Background;

/// Main application state
///
/// Owned by the event loop. Worker threads never touch it; they report
/// through the background sender and the loop applies their results.
#[derive(Debug)]
pub struct App {
    /// Application configuration
    pub config: Config,

    /// Git access for the repository being worked on
    pub git: Client<SharedExecutor>,

    /// Work tree root; conflicted paths are relative to it
    pub root: PathBuf,

    /// Current application mode
    pub mode: Mode,

    /// Files with unmerged index entries
    pub files: Vec<String>,

    /// Selected row in the file picker
    pub selected_file: usize,

    /// File being resolved, if any
    pub session: Option<ResolverSession>,

    /// Scroll adjustment applied on top of the hunk-aligned pane offset
    pub scroll: isize,

    /// Status message to display
    pub status_message: Option<String>,

    /// Progress of a running or just-finished sync
    pub sync: Option<SyncProgress>,

    /// Whether the application should quit
    pub should_quit: bool,

    background: Sender<Background>,
}

/// Application modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Keys map to actions
    Normal,
    /// Keybinding overlay
    Help,
    /// Waiting for yes/no
    Confirming(ConfirmAction),
    /// Sync workflow running on a worker thread
    Syncing,
    /// A post-save follow-up running on a worker thread
    Running(FollowUp),
    /// Error modal
    Error(String),
    /// Success modal
    Success(String),
}

/// What a confirmation prompt will do when accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Save with conflicts still unresolved
    SavePartial {
        /// How many conflicts are still open
        unresolved: usize,
    },
    /// Continue the rebase or commit the merge
    FollowUp(FollowUp),
    /// Run the sync workflow
    Sync {
        /// Branch to merge into
        main: String,
        /// Branch to rebase and merge
        feature: String,
    },
    /// Close the file, dropping resolutions
    Discard,
    /// Quit, dropping resolutions
    Quit,
}

/// One line of the sync progress list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Started, not finished
    Running,
    /// Finished successfully
    Done,
    /// The run stopped here
    Failed,
}

/// Sync progress as reported by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncProgress {
    /// Branch being merged into
    pub main: String,
    /// Branch being rebased
    pub feature: String,
    /// Total planned steps, known once the first step starts
    pub total: usize,
    /// Steps seen so far with their state
    pub steps: Vec<(String, StepState)>,
}

impl SyncProgress {
    /// A sync that has not started yet
    #[must_use]
    pub const fn new(main: String, feature: String) -> Self {
        Self {
            main,
            feature,
            total: 0,
            steps: Vec::new(),
        }
    }

    /// Fold one progress event in
    pub fn apply(&mut self, progress: Progress) {
        match progress {
            Progress::StepStarted { total, label, .. } => {
                self.total = total;
                self.steps.push((label, StepState::Running));
            }
            Progress::StepFinished { step, .. } => {
                if let Some(entry) = self.steps.get_mut(step.saturating_sub(1)) {
                    entry.1 = StepState::Done;
                }
            }
        }
    }

    /// Mark the running step as the one that failed
    pub fn fail(&mut self) {
        if let Some(entry) = self
            .steps
            .iter_mut()
            .rev()
            .find(|(_, state)| *state == StepState::Running)
        {
            entry.1 = StepState::Failed;
        }
    }
}

impl App {
    /// Create the application state
    #[must_use]
    pub const fn new(
        config: Config,
        git: Client<SharedExecutor>,
        root: PathBuf,
        background: Sender<Background>,
    ) -> Self {
        Self {
            config,
            git,
            root,
            mode: Mode::Normal,
            files: Vec::new(),
            selected_file: 0,
            session: None,
            scroll: 0,
            status_message: None,
            sync: None,
            should_quit: false,
            background,
        }
    }

    /// Sender handed to worker threads
    #[must_use]
    pub fn background_sender(&self) -> Sender<Background> {
        self.background.clone()
    }

    /// Enter a new application mode
    pub fn enter_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Return to normal mode
    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Show an error modal
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.mode = Mode::Error(message.into());
    }

    /// Show a success modal
    pub fn show_success(&mut self, message: impl Into<String>) {
        self.mode = Mode::Success(message.into());
    }

    /// Set a status message to display
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Selected file in the picker
    #[must_use]
    pub fn selected_path(&self) -> Option<&str> {
        self.files.get(self.selected_file).map(String::as_str)
    }

    /// Move the picker selection down, stopping at the last file
    pub fn select_next_file(&mut self) {
        if self.selected_file + 1 < self.files.len() {
            self.selected_file += 1;
        }
    }

    /// Move the picker selection up, stopping at the first file
    pub const fn select_prev_file(&mut self) {
        self.selected_file = self.selected_file.saturating_sub(1);
    }

    /// Path shown to the user: relative to the work tree when possible
    #[must_use]
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Whether the open file has resolutions that would be lost on close
    #[must_use]
    pub fn has_unsaved_resolutions(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.hunks().iter().any(crate::conflict::Hunk::is_resolved))
    }

    /// Scroll the panes up
    pub const fn scroll_up(&mut self, amount: isize) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    /// Scroll the panes down
    pub const fn scroll_down(&mut self, amount: isize) {
        self.scroll = self.scroll.saturating_add(amount);
    }

    /// Re-align the panes on the selected hunk
    pub const fn reset_scroll(&mut self) {
        self.scroll = 0;
    }
}
