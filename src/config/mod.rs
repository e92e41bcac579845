//! Configuration management for rejoin

mod keys;

pub use keys::{Action, ActionGroup, KeyBindings};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::split_args;
use crate::conflict::ParseMode;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Branch that `sync` merges into when none is given
    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    /// Extra arguments for `git rebase`, written shell-style
    #[serde(default)]
    pub rebase_args: String,

    /// Reject conflict files whose markers are unterminated
    #[serde(default)]
    pub strict_markers: bool,

    /// Event loop tick in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Keybindings configuration
    #[serde(default)]
    pub keys: KeyBindings,
}

fn default_main_branch() -> String {
    "main".to_string()
}

const fn default_poll_interval() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_branch: default_main_branch(),
            rebase_args: String::new(),
            strict_markers: false,
            poll_interval_ms: default_poll_interval(),
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing the config file fails
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.keys.merge_defaults();
        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        crate::paths::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rejoin")
            .join("config.json")
    }

    /// How strictly conflict markers are parsed
    #[must_use]
    pub const fn parse_mode(&self) -> ParseMode {
        if self.strict_markers {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Configured extra rebase arguments as an argv list
    ///
    /// # Errors
    ///
    /// Returns an error if `rebase_args` has unbalanced quotes
    pub fn rebase_argv(&self) -> Result<Vec<String>> {
        split_args(&self.rebase_args).context("Invalid rebase_args in config")
    }

    /// Event loop tick
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
