//! Splitting a conflicted file into chunks and hunks

use tracing::{debug, warn};

use super::{
    BASE_MARKER, Chunk, Hunk, LineEnding, Markers, OURS_MARKER, SEPARATOR_MARKER, THEIRS_MARKER,
};
use crate::error::{ParseError, Section};

/// What to do when input ends inside an open conflict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Keep the remaining lines in the open section and close it at EOF
    #[default]
    Lenient,
    /// Reject the file with [`ParseError::Unterminated`]
    Strict,
}

/// A parsed conflicted file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// File structure in original order
    pub chunks: Vec<Chunk>,
    /// Conflicts, indexed by [`Chunk::Conflict`]
    pub hunks: Vec<Hunk>,
    /// Terminator for lines that have none of their own (the first one seen)
    pub line_ending: LineEnding,
    /// Terminator of every source line in order; `None` for a last line
    /// without one
    pub endings: Vec<Option<LineEnding>>,
}

/// Parse raw file contents
///
/// # Errors
///
/// Returns [`ParseError::NotUtf8`] for non-UTF-8 input, or
/// [`ParseError::Unterminated`] for a truncated conflict in strict mode
pub fn parse(bytes: &[u8], mode: ParseMode) -> Result<Parsed, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::NotUtf8 {
        offset: e.valid_up_to(),
    })?;
    parse_str(text, mode)
}

/// Parse file contents already decoded as text
///
/// # Errors
///
/// Returns [`ParseError::Unterminated`] for a truncated conflict in strict mode
pub fn parse_str(text: &str, mode: ParseMode) -> Result<Parsed, ParseError> {
    let (lines, endings) = split_lines(text);
    let line_ending = endings.iter().flatten().next().copied().unwrap_or_default();
    let mut builder = Builder::default();

    for (index, line) in lines.into_iter().enumerate() {
        builder.feed(index + 1, line);
    }

    let parsed = builder.finish(mode, line_ending, endings)?;
    debug!(
        hunks = parsed.hunks.len(),
        chunks = parsed.chunks.len(),
        ?line_ending,
        "Parsed conflict file"
    );
    Ok(parsed)
}

/// Split on `\n`, moving one `\r` before it into the line's terminator; a
/// final terminator does not start an extra empty line.
fn split_lines(text: &str) -> (Vec<&str>, Vec<Option<LineEnding>>) {
    let mut lines = Vec::new();
    let mut endings = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(pos) = rest.find('\n') else {
            lines.push(rest);
            endings.push(None);
            break;
        };
        let line = &rest[..pos];
        match line.strip_suffix('\r') {
            Some(stripped) => {
                lines.push(stripped);
                endings.push(Some(LineEnding::CrLf));
            }
            None => {
                lines.push(line);
                endings.push(Some(LineEnding::Lf));
            }
        }
        rest = &rest[pos + 1..];
    }

    (lines, endings)
}

/// A conflict being read
#[derive(Debug)]
struct Open {
    line: usize,
    section: Section,
    ours: Vec<String>,
    base: Option<Vec<String>>,
    theirs: Vec<String>,
    markers: Markers,
}

impl Open {
    fn new(line: usize, open_marker: &str) -> Self {
        Self {
            line,
            section: Section::Ours,
            ours: Vec::new(),
            base: None,
            theirs: Vec::new(),
            markers: Markers {
                open: open_marker.to_string(),
                base: None,
                separator: None,
                close: None,
            },
        }
    }

    fn into_hunk(self) -> Hunk {
        Hunk::new(self.ours, self.base, self.theirs, self.markers)
    }
}

#[derive(Debug, Default)]
struct Builder {
    chunks: Vec<Chunk>,
    hunks: Vec<Hunk>,
    text: Vec<String>,
    open: Option<Open>,
}

impl Builder {
    fn feed(&mut self, number: usize, line: &str) {
        let Some(open) = self.open.as_mut() else {
            if line.starts_with(OURS_MARKER) {
                self.flush_text();
                self.open = Some(Open::new(number, line));
            } else {
                self.text.push(line.to_string());
            }
            return;
        };

        match open.section {
            Section::Ours if line.starts_with(BASE_MARKER) => {
                open.markers.base = Some(line.to_string());
                open.base = Some(Vec::new());
                open.section = Section::Base;
            }
            Section::Ours | Section::Base if line.starts_with(SEPARATOR_MARKER) => {
                open.markers.separator = Some(line.to_string());
                open.section = Section::Theirs;
            }
            Section::Ours => open.ours.push(line.to_string()),
            Section::Base => {
                if let Some(base) = open.base.as_mut() {
                    base.push(line.to_string());
                }
            }
            Section::Theirs if line.starts_with(THEIRS_MARKER) => {
                open.markers.close = Some(line.to_string());
                self.close_hunk();
            }
            Section::Theirs => open.theirs.push(line.to_string()),
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.chunks.push(Chunk::Text(std::mem::take(&mut self.text)));
        }
    }

    fn close_hunk(&mut self) {
        if let Some(open) = self.open.take() {
            self.chunks.push(Chunk::Conflict(self.hunks.len()));
            self.hunks.push(open.into_hunk());
        }
    }

    fn finish(
        mut self,
        mode: ParseMode,
        line_ending: LineEnding,
        endings: Vec<Option<LineEnding>>,
    ) -> Result<Parsed, ParseError> {
        if let Some(open) = &self.open {
            let (line, section) = (open.line, open.section);
            match mode {
                ParseMode::Strict => return Err(ParseError::Unterminated { line, section }),
                ParseMode::Lenient => {
                    warn!(line, ?section, "Conflict not closed before end of file");
                    self.close_hunk();
                }
            }
        }
        self.flush_text();

        Ok(Parsed {
            chunks: self.chunks,
            hunks: self.hunks,
            line_ending,
            endings,
        })
    }
}
