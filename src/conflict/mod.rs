//! Conflict-marker files as an editable model
//!
//! A conflicted file is split into [`Chunk`]s: runs of literal text and
//! references into a list of [`Hunk`]s. The chunk list alone decides output
//! order; hunks carry the two candidate sides and the user's choice.

mod parse;
mod save;
mod session;

pub use parse::{ParseMode, Parsed, parse, parse_str};
pub use save::{FollowUp, SaveOutcome, SaveReport, save};
pub use session::{OpenOutcome, ResolverSession, View, ViewLines};

/// Opens a conflict; text after it names the "ours" side
pub const OURS_MARKER: &str = "<<<<<<<";
/// Opens the diff3 common-ancestor section
pub const BASE_MARKER: &str = "|||||||";
/// Separates the "ours" (or base) section from "theirs"
pub const SEPARATOR_MARKER: &str = "=======";
/// Closes a conflict; text after it names the "theirs" side
pub const THEIRS_MARKER: &str = ">>>>>>>";

/// How a hunk was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the local side
    Ours,
    /// Keep the incoming side
    Theirs,
    /// Keep both, local first
    Both,
    /// Replace the hunk with these lines
    Custom(Vec<String>),
}

impl Resolution {
    /// Short label for status lines
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ours => "ours",
            Self::Theirs => "theirs",
            Self::Both => "both",
            Self::Custom(_) => "edited",
        }
    }
}

/// Marker lines exactly as they appeared in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// The `<<<<<<<` line
    pub open: String,
    /// The `|||||||` line of a diff3-style conflict
    pub base: Option<String>,
    /// The `=======` line; `None` only for truncated input read leniently
    pub separator: Option<String>,
    /// The `>>>>>>>` line; `None` only for truncated input read leniently
    pub close: Option<String>,
}

/// One conflicting region with its two candidate line sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    ours: Vec<String>,
    base: Option<Vec<String>>,
    theirs: Vec<String>,
    markers: Markers,
    resolution: Option<Resolution>,
}

impl Hunk {
    /// An unresolved hunk
    #[must_use]
    pub const fn new(
        ours: Vec<String>,
        base: Option<Vec<String>>,
        theirs: Vec<String>,
        markers: Markers,
    ) -> Self {
        Self {
            ours,
            base,
            theirs,
            markers,
            resolution: None,
        }
    }

    /// Lines from the local side
    #[must_use]
    pub fn ours(&self) -> &[String] {
        &self.ours
    }

    /// Lines from the incoming side
    #[must_use]
    pub fn theirs(&self) -> &[String] {
        &self.theirs
    }

    /// Common-ancestor lines, present for diff3-style markers
    #[must_use]
    pub fn base(&self) -> Option<&[String]> {
        self.base.as_deref()
    }

    /// Original marker lines
    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Label after `<<<<<<<` (usually `HEAD`)
    #[must_use]
    pub fn ours_label(&self) -> &str {
        let open = &self.markers.open;
        open.strip_prefix(OURS_MARKER).unwrap_or(open).trim()
    }

    /// Label after `>>>>>>>` (a branch name or commit)
    #[must_use]
    pub fn theirs_label(&self) -> &str {
        self.markers
            .close
            .as_deref()
            .map_or("", |close| close.strip_prefix(THEIRS_MARKER).unwrap_or(close).trim())
    }

    /// Current resolution, `None` while unresolved
    #[must_use]
    pub const fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// Whether the user has picked a resolution
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    pub(crate) fn set_resolution(&mut self, resolution: Option<Resolution>) {
        self.resolution = resolution;
    }

    /// Append what this hunk contributes to the merged file
    pub(crate) fn emit_result(&self, out: &mut Vec<String>) {
        match &self.resolution {
            None => self.emit_marked(out),
            Some(Resolution::Ours) => out.extend_from_slice(&self.ours),
            Some(Resolution::Theirs) => out.extend_from_slice(&self.theirs),
            Some(Resolution::Both) => {
                out.extend_from_slice(&self.ours);
                out.extend_from_slice(&self.theirs);
            }
            Some(Resolution::Custom(lines)) => out.extend_from_slice(lines),
        }
    }

    /// Append the hunk in its original marker-delimited form
    pub(crate) fn emit_marked(&self, out: &mut Vec<String>) {
        out.extend(self.marked_lines().into_iter().map(str::to_string));
    }

    /// The hunk's lines exactly as they sat in the file
    pub(crate) fn marked_lines(&self) -> Vec<&str> {
        let mut lines = vec![self.markers.open.as_str()];
        lines.extend(self.ours.iter().map(String::as_str));
        if let Some(base_marker) = &self.markers.base {
            lines.push(base_marker);
            lines.extend(self.base.iter().flatten().map(String::as_str));
        }
        lines.extend(self.markers.separator.as_deref());
        lines.extend(self.theirs.iter().map(String::as_str));
        lines.extend(self.markers.close.as_deref());
        lines
    }

    /// Offset of the first incoming line within [`Self::marked_lines`]
    pub(crate) fn theirs_offset(&self) -> usize {
        let base = self
            .markers
            .base
            .as_ref()
            .map_or(0, |_| 1 + self.base.as_ref().map_or(0, Vec::len));
        1 + self.ours.len() + base + usize::from(self.markers.separator.is_some())
    }
}

/// Structural unit of a conflicted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Lines reproduced verbatim
    Text(Vec<String>),
    /// Index into the hunk list
    Conflict(usize),
}

/// Line terminator detected in the input and used when writing it back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator itself
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Whether a line contains any conflict marker
#[must_use]
pub fn is_marker_line(line: &str) -> bool {
    [OURS_MARKER, BASE_MARKER, SEPARATOR_MARKER, THEIRS_MARKER]
        .iter()
        .any(|marker| line.starts_with(marker))
}
