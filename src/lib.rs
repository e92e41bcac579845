//! rejoin - resolve merge conflicts and sync feature branches from the terminal
//!
//! The library holds the conflict engine (`conflict`), the sync workflow
//! (`workflow`), git access (`git`) and the TUI built on them.

mod command;

pub mod app;
pub mod config;
pub mod conflict;
pub mod error;
pub mod git;
pub mod paths;
pub mod tui;
pub mod workflow;

pub use app::App;
pub use command::{join_args, split_args};
pub use config::Config;
pub use conflict::ResolverSession;
pub use error::{Error, Result};
