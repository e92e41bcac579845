//! Editable resolution state for one conflicted file

use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Chunk, Hunk, LineEnding, ParseMode, Parsed, Resolution, parse};
use crate::error::{Error, ParseError, Result};

/// Result of opening a file for resolution
#[derive(Debug)]
pub enum OpenOutcome {
    /// The file has at least one conflict
    Ready(ResolverSession),
    /// The file parsed cleanly and has nothing to resolve
    NoConflicts,
}

/// Which of the three synchronized panes to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every conflict shows the local side
    Local,
    /// Every conflict shows the incoming side
    Incoming,
    /// The merged file as it would be saved now
    Result,
}

/// A rendered view plus where each hunk landed in it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLines {
    /// Full file contents for this view
    pub lines: Vec<String>,
    /// Line range of each hunk, index-aligned with the hunk list
    pub spans: Vec<Range<usize>>,
}

/// One conflicted file under resolution
///
/// Owned by the caller and mutated only through its methods. `cursor` always
/// points at an existing hunk because a session is never built without one.
#[derive(Debug, Clone)]
pub struct ResolverSession {
    path: PathBuf,
    chunks: Vec<Chunk>,
    hunks: Vec<Hunk>,
    cursor: usize,
    line_ending: LineEnding,
    endings: Vec<Option<LineEnding>>,
}

impl ResolverSession {
    /// Read and parse `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty or non-UTF-8 path (git
    /// could not be handed it as a pathspec) and [`Error::Parse`] when the
    /// file cannot be read or parsed
    pub fn open(path: impl Into<PathBuf>, mode: ParseMode) -> Result<OpenOutcome> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::Validation("No file path given".to_string()));
        }
        if path.to_str().is_none() {
            return Err(Error::Validation(format!(
                "{} is not a UTF-8 path",
                path.display()
            )));
        }

        let bytes = std::fs::read(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;
        let parsed = parse(&bytes, mode)?;
        Ok(Self::from_parsed(path, parsed))
    }

    /// Build a session from an already parsed file
    #[must_use]
    pub fn from_parsed(path: PathBuf, parsed: Parsed) -> OpenOutcome {
        if parsed.hunks.is_empty() {
            debug!(path = %path.display(), "No conflicts in file");
            return OpenOutcome::NoConflicts;
        }

        info!(path = %path.display(), hunks = parsed.hunks.len(), "Opened resolver session");
        OpenOutcome::Ready(Self {
            path,
            chunks: parsed.chunks,
            hunks: parsed.hunks,
            cursor: 0,
            line_ending: parsed.line_ending,
            endings: parsed.endings,
        })
    }

    /// File being resolved
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File structure in original order
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// All conflicts in file order
    #[must_use]
    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Conflict at `index`, if it exists
    #[must_use]
    pub fn hunk(&self, index: usize) -> Option<&Hunk> {
        self.hunks.get(index)
    }

    /// Index of the selected conflict
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The selected conflict
    #[must_use]
    pub fn current(&self) -> Option<&Hunk> {
        self.hunks.get(self.cursor)
    }

    /// Line terminator used on save
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Select the next conflict; stays put on the last one
    pub fn next(&mut self) {
        if self.cursor + 1 < self.hunks.len() {
            self.cursor += 1;
        }
    }

    /// Select the previous conflict; stays put on the first one
    pub const fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Select a conflict directly
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHunk`] if `index` is out of range
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.cursor = index;
        Ok(())
    }

    /// Move to the next unresolved conflict after the cursor, wrapping around
    ///
    /// Returns whether the cursor moved.
    pub fn next_unresolved(&mut self) -> bool {
        let count = self.hunks.len();
        let found = (1..=count)
            .map(|offset| (self.cursor + offset) % count)
            .find(|&index| !self.hunks[index].is_resolved());
        match found {
            Some(index) if index != self.cursor => {
                self.cursor = index;
                true
            }
            _ => false,
        }
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.hunks.len() {
            Ok(())
        } else {
            Err(Error::InvalidHunk {
                index,
                count: self.hunks.len(),
            })
        }
    }

    fn set(&mut self, index: usize, resolution: Option<Resolution>) -> Result<()> {
        self.check(index)?;
        debug!(index, resolution = ?resolution.as_ref().map(Resolution::label), "Resolving hunk");
        self.hunks[index].set_resolution(resolution);
        Ok(())
    }

    /// Resolve a conflict with the local side
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHunk`] if `index` is out of range
    pub fn accept_ours(&mut self, index: usize) -> Result<()> {
        self.set(index, Some(Resolution::Ours))
    }

    /// Resolve a conflict with the incoming side
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHunk`] if `index` is out of range
    pub fn accept_theirs(&mut self, index: usize) -> Result<()> {
        self.set(index, Some(Resolution::Theirs))
    }

    /// Resolve a conflict with both sides, local first
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHunk`] if `index` is out of range
    pub fn accept_both(&mut self, index: usize) -> Result<()> {
        self.set(index, Some(Resolution::Both))
    }

    /// Resolve a conflict with hand-written lines
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHunk`] if `index` is out of range
    pub fn resolve_with(&mut self, index: usize, lines: Vec<String>) -> Result<()> {
        self.set(index, Some(Resolution::Custom(lines)))
    }

    /// Put a conflict back to unresolved
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHunk`] if `index` is out of range
    pub fn unresolve(&mut self, index: usize) -> Result<()> {
        self.set(index, None)
    }

    /// Resolve every conflict with the local side
    pub fn accept_all_ours(&mut self) {
        self.accept_all(&Resolution::Ours);
    }

    /// Resolve every conflict with the incoming side
    pub fn accept_all_theirs(&mut self) {
        self.accept_all(&Resolution::Theirs);
    }

    fn accept_all(&mut self, resolution: &Resolution) {
        for hunk in &mut self.hunks {
            hunk.set_resolution(Some(resolution.clone()));
        }
        info!(resolution = resolution.label(), count = self.hunks.len(), "Resolved all hunks");
    }

    /// Number of conflicts still unresolved
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.hunks.iter().filter(|hunk| !hunk.is_resolved()).count()
    }

    /// Whether every conflict has a resolution
    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved_count() == 0
    }

    /// The merged file as lines
    ///
    /// Unresolved conflicts keep their original markers.
    #[must_use]
    pub fn build_result(&self) -> Vec<String> {
        self.view(View::Result).lines
    }

    /// Render one of the three panes with per-hunk line spans
    #[must_use]
    pub fn view(&self, view: View) -> ViewLines {
        let mut lines = Vec::new();
        let mut spans = vec![0..0; self.hunks.len()];

        for chunk in &self.chunks {
            match chunk {
                Chunk::Text(text) => lines.extend_from_slice(text),
                Chunk::Conflict(index) => {
                    let Some(hunk) = self.hunks.get(*index) else {
                        continue;
                    };
                    let start = lines.len();
                    match view {
                        View::Local => lines.extend_from_slice(hunk.ours()),
                        View::Incoming => lines.extend_from_slice(hunk.theirs()),
                        View::Result => hunk.emit_result(&mut lines),
                    }
                    spans[*index] = start..lines.len();
                }
            }
        }

        ViewLines { lines, spans }
    }

    /// The merged file as bytes
    ///
    /// Lines taken from the file keep their own terminator. Hand-written
    /// lines, and an unterminated line that is no longer last, get the
    /// file's line ending.
    #[must_use]
    pub fn render_bytes(&self) -> Vec<u8> {
        let lines = self.result_with_endings();
        let last = lines.len().saturating_sub(1);
        let mut out = String::new();
        for (index, (line, ending)) in lines.into_iter().enumerate() {
            out.push_str(line);
            match ending {
                Some(ending) => out.push_str(ending.as_str()),
                None if index < last => out.push_str(self.line_ending.as_str()),
                None => {}
            }
        }
        out.into_bytes()
    }

    fn ending_at(&self, index: usize) -> Option<LineEnding> {
        self.endings
            .get(index)
            .copied()
            .unwrap_or(Some(self.line_ending))
    }

    fn push_source<'a>(
        &self,
        out: &mut Vec<(&'a str, Option<LineEnding>)>,
        lines: impl IntoIterator<Item = &'a str>,
        start: usize,
    ) {
        out.extend(
            lines
                .into_iter()
                .enumerate()
                .map(|(offset, line)| (line, self.ending_at(start + offset))),
        );
    }

    /// [`Self::build_result`] with the terminator each line is written with
    fn result_with_endings(&self) -> Vec<(&str, Option<LineEnding>)> {
        let mut out = Vec::new();
        let mut source = 0;

        for chunk in &self.chunks {
            match chunk {
                Chunk::Text(text) => {
                    self.push_source(&mut out, text.iter().map(String::as_str), source);
                    source += text.len();
                }
                Chunk::Conflict(index) => {
                    let Some(hunk) = self.hunks.get(*index) else {
                        continue;
                    };
                    let marked = hunk.marked_lines();
                    let ours = hunk.ours().iter().map(String::as_str);
                    let theirs = hunk.theirs().iter().map(String::as_str);
                    let theirs_start = source + hunk.theirs_offset();
                    match hunk.resolution() {
                        None => self.push_source(&mut out, marked.iter().copied(), source),
                        Some(Resolution::Ours) => self.push_source(&mut out, ours, source + 1),
                        Some(Resolution::Theirs) => {
                            self.push_source(&mut out, theirs, theirs_start);
                        }
                        Some(Resolution::Both) => {
                            self.push_source(&mut out, ours, source + 1);
                            self.push_source(&mut out, theirs, theirs_start);
                        }
                        Some(Resolution::Custom(lines)) => out.extend(
                            lines
                                .iter()
                                .map(|line| (line.as_str(), Some(self.line_ending))),
                        ),
                    }
                    source += marked.len();
                }
            }
        }

        out
    }

    /// Write the merged file over the original
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file cannot be written
    pub fn write(&self) -> Result<()> {
        std::fs::write(&self.path, self.render_bytes()).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(
            path = %self.path.display(),
            unresolved = self.unresolved_count(),
            "Wrote resolved file"
        );
        Ok(())
    }
}
