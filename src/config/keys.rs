//! Keybinding configuration

use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Select the next conflict (or file in the picker)
    NextConflict,
    /// Select the previous conflict (or file in the picker)
    PrevConflict,
    /// Jump to the next unresolved conflict
    NextUnresolved,
    /// Resolve the selected conflict with the local side
    AcceptOurs,
    /// Resolve the selected conflict with the incoming side
    AcceptTheirs,
    /// Resolve the selected conflict with both sides
    AcceptBoth,
    /// Resolve every conflict with the local side
    AcceptAllOurs,
    /// Resolve every conflict with the incoming side
    AcceptAllTheirs,
    /// Clear the selected conflict's resolution
    Unresolve,
    /// Write the file and stage it
    Save,
    /// Open the selected file from the picker
    Open,
    /// Rebase the current branch onto main and merge it back
    Sync,
    /// Scroll the panes up
    ScrollUp,
    /// Scroll the panes down
    ScrollDown,
    /// Show help
    Help,
    /// Quit application
    Quit,
    /// Cancel current operation
    Cancel,
    /// Confirm current operation
    Confirm,
}

/// Categories for grouping actions in help display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGroup {
    /// Moving between conflicts
    Navigation,
    /// Choosing a side
    Resolve,
    /// Saving, opening files and syncing branches
    Files,
    /// Miscellaneous actions
    Other,
    /// Actions not shown in help (internal or context-specific)
    Hidden,
}

impl ActionGroup {
    /// Get the display title for this group
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Resolve => "Resolve",
            Self::Files => "Files",
            Self::Other => "Other",
            Self::Hidden => "",
        }
    }
}

impl Action {
    /// Get the display description for this action
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NextConflict => "Next conflict",
            Self::PrevConflict => "Previous conflict",
            Self::NextUnresolved => "Next unresolved conflict",
            Self::AcceptOurs => "Take local (ours)",
            Self::AcceptTheirs => "Take incoming (theirs)",
            Self::AcceptBoth => "Take both, local first",
            Self::AcceptAllOurs => "Take local for every conflict",
            Self::AcceptAllTheirs => "Take incoming for every conflict",
            Self::Unresolve => "Undo resolution",
            Self::Save => "Save and stage file",
            Self::Open => "Open file",
            Self::Sync => "Sync branch with main",
            Self::ScrollUp => "Scroll up",
            Self::ScrollDown => "Scroll down",
            Self::Help => "Show this help",
            Self::Quit => "Quit",
            Self::Cancel => "Cancel",
            Self::Confirm => "Confirm",
        }
    }

    /// Get the group this action belongs to
    #[must_use]
    pub const fn group(self) -> ActionGroup {
        match self {
            Self::NextConflict
            | Self::PrevConflict
            | Self::NextUnresolved
            | Self::ScrollUp
            | Self::ScrollDown => ActionGroup::Navigation,
            Self::AcceptOurs
            | Self::AcceptTheirs
            | Self::AcceptBoth
            | Self::AcceptAllOurs
            | Self::AcceptAllTheirs
            | Self::Unresolve => ActionGroup::Resolve,
            Self::Save | Self::Open | Self::Sync => ActionGroup::Files,
            Self::Help | Self::Quit => ActionGroup::Other,
            Self::Cancel | Self::Confirm => ActionGroup::Hidden,
        }
    }

    /// All actions in display order for help
    pub const ALL_FOR_HELP: &'static [Self] = &[
        // Navigation
        Self::NextConflict,
        Self::PrevConflict,
        Self::NextUnresolved,
        Self::ScrollUp,
        Self::ScrollDown,
        // Resolve
        Self::AcceptOurs,
        Self::AcceptTheirs,
        Self::AcceptBoth,
        Self::AcceptAllOurs,
        Self::AcceptAllTheirs,
        Self::Unresolve,
        // Files
        Self::Save,
        Self::Open,
        Self::Sync,
        // Other
        Self::Help,
        Self::Quit,
    ];
}

/// Keybinding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Map of key strings to actions (for serialization)
    bindings: HashMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = [
            ("j", Action::NextConflict),
            ("Down", Action::NextConflict),
            ("k", Action::PrevConflict),
            ("Up", Action::PrevConflict),
            ("n", Action::NextUnresolved),
            ("o", Action::AcceptOurs),
            ("Left", Action::AcceptOurs),
            ("t", Action::AcceptTheirs),
            ("Right", Action::AcceptTheirs),
            ("b", Action::AcceptBoth),
            ("O", Action::AcceptAllOurs),
            ("T", Action::AcceptAllTheirs),
            ("u", Action::Unresolve),
            ("w", Action::Save),
            ("Ctrl+s", Action::Save),
            ("Enter", Action::Open),
            ("S", Action::Sync),
            ("Ctrl+u", Action::ScrollUp),
            ("PageUp", Action::ScrollUp),
            ("Ctrl+d", Action::ScrollDown),
            ("PageDown", Action::ScrollDown),
            ("?", Action::Help),
            ("q", Action::Quit),
            ("Esc", Action::Cancel),
            ("y", Action::Confirm),
        ]
        .into_iter()
        .map(|(key, action)| (key.to_string(), action))
        .collect();

        Self { bindings }
    }
}

impl KeyBindings {
    /// Merge in any missing default keybindings
    ///
    /// Keeps older saved configs working when new actions are added.
    pub fn merge_defaults(&mut self) {
        let defaults = Self::default();
        for (key, action) in defaults.bindings {
            self.bindings.entry(key).or_insert(action);
        }
    }

    /// Get the action for a key event
    #[must_use]
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let key_str = key_to_string(code, modifiers);
        self.bindings.get(&key_str).copied()
    }

    /// Get all bindings for an action
    #[must_use]
    pub fn keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings
            .iter()
            .filter_map(|(k, &v)| (v == action).then(|| k.clone()))
            .collect()
    }

    /// Format key(s) for an action for display (e.g. "j/Down")
    #[must_use]
    pub fn format_keys(&self, action: Action) -> String {
        let mut keys = self.keys_for_action(action);
        // Single characters first, then alphabetical
        keys.sort_by(|a, b| {
            let a_simple = a.chars().count() == 1;
            let b_simple = b.chars().count() == 1;
            b_simple.cmp(&a_simple).then_with(|| a.cmp(b))
        });
        keys.join("/")
    }

    /// Generate a formatted help line for an action: "  keys    description"
    #[must_use]
    pub fn help_line(&self, action: Action) -> String {
        let keys = self.format_keys(action);
        format!("  {keys:<12} {}", action.description())
    }

    fn hints(&self, hints: &[(Action, &str)]) -> String {
        hints
            .iter()
            .map(|(action, label)| {
                let key = self
                    .format_keys(*action)
                    .split('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                format!("[{key}]{label}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Status bar hints while resolving a file
    #[must_use]
    pub fn resolver_hints(&self) -> String {
        self.hints(&[
            (Action::AcceptOurs, "ours"),
            (Action::AcceptTheirs, "theirs"),
            (Action::AcceptBoth, "both"),
            (Action::NextUnresolved, "next"),
            (Action::Save, "save"),
            (Action::Help, "help"),
        ])
    }

    /// Status bar hints in the file picker
    #[must_use]
    pub fn picker_hints(&self) -> String {
        self.hints(&[
            (Action::Open, "open"),
            (Action::Sync, "sync"),
            (Action::Help, "help"),
            (Action::Quit, "quit"),
        ])
    }
}

/// Convert a key code and modifiers to a string representation
#[must_use]
pub fn key_to_string(code: KeyCode, modifiers: KeyModifiers) -> String {
    let mut parts = Vec::new();

    if modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if modifiers.contains(KeyModifiers::SHIFT) && !matches!(code, KeyCode::Char(_)) {
        parts.push("Shift".to_string());
    }

    let key_part = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return String::new(),
    };

    parts.push(key_part);
    parts.join("+")
}
