//! Error types for the resolver and the sync workflow.
//!
//! Everything here is recoverable: the controller turns each variant into an
//! error modal (or a CLI message) and keeps running.

use std::path::PathBuf;

use thiserror::Error;

/// Which part of a hunk the parser was inside when input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Between `<<<<<<<` and `=======` (or `|||||||`)
    Ours,
    /// Between `|||||||` and `=======`
    Base,
    /// Between `=======` and `>>>>>>>`
    Theirs,
}

impl Section {
    /// The marker that would have closed this section
    #[must_use]
    pub const fn closing_marker(self) -> &'static str {
        match self {
            Self::Ours | Self::Base => "=======",
            Self::Theirs => ">>>>>>>",
        }
    }
}

/// Failures while reading or parsing a conflicted file
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8 and cannot be resolved line by line
    #[error("file is not valid UTF-8 (byte offset {offset})")]
    NotUtf8 {
        /// Offset of the first invalid byte
        offset: usize,
    },

    /// A conflict was opened but input ended before it was closed
    #[error("conflict opened on line {line} is missing its {} marker", .section.closing_marker())]
    Unterminated {
        /// 1-based line of the `<<<<<<<` marker
        line: usize,
        /// Section that was still open at end of input
        section: Section,
    },
}

/// Errors surfaced by resolver and workflow operations
#[derive(Debug, Error)]
pub enum Error {
    /// The conflicted file could not be loaded
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A required argument was missing or invalid; nothing was executed
    #[error("{0}")]
    Validation(String),

    /// An external command exited unsuccessfully
    #[error("{label} failed:\n{}", .lines.join("\n"))]
    Process {
        /// What was being attempted
        label: String,
        /// Raw stdout/stderr lines from the command
        lines: Vec<String>,
    },

    /// A sync workflow step failed; earlier steps stay applied
    #[error("step {step} ({label}) failed:\n{}", .lines.join("\n"))]
    Workflow {
        /// 1-based position of the failed step in the executed plan
        step: usize,
        /// Label of the failed step
        label: String,
        /// Raw stdout/stderr lines from the failed step
        lines: Vec<String>,
    },

    /// A hunk index outside the session's hunk list
    #[error("no conflict #{} (file has {count})", .index + 1)]
    InvalidHunk {
        /// Requested 0-based index
        index: usize,
        /// Number of hunks in the session
        count: usize,
    },

    /// Writing the resolved file failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external command could not be started at all
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for resolver and workflow operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
