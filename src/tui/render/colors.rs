//! Color palette for the TUI

use ratatui::style::Color;
use ratatui::widgets::BorderType;

// UI Chrome
pub const BORDER: Color = Color::Rgb(100, 110, 130);
pub const BORDER_TYPE: BorderType = BorderType::Rounded;
pub const SELECTED: Color = Color::Rgb(100, 180, 220);
pub const SURFACE: Color = Color::Rgb(30, 32, 40);
pub const SURFACE_HIGHLIGHT: Color = Color::Rgb(50, 55, 70);

// Text
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 230);
pub const TEXT_DIM: Color = Color::Rgb(130, 135, 150);
pub const TEXT_MUTED: Color = Color::Rgb(90, 95, 110);

// Conflict sides
pub const OURS: Color = Color::Rgb(120, 180, 120);
pub const THEIRS: Color = Color::Rgb(100, 140, 200);
pub const RESOLVED: Color = Color::Rgb(160, 200, 160);
pub const UNRESOLVED: Color = Color::Rgb(200, 160, 80);
pub const MARKER: Color = Color::Rgb(200, 100, 100);

// Modals
pub const MODAL_BG: Color = Color::Rgb(25, 27, 35);
pub const MODAL_BORDER: Color = Color::Rgb(100, 140, 200);
pub const MODAL_BORDER_WARNING: Color = Color::Rgb(200, 160, 80);
pub const MODAL_BORDER_ERROR: Color = Color::Rgb(200, 100, 100);

// Accent (for confirmations)
pub const ACCENT_POSITIVE: Color = Color::Rgb(120, 180, 120);
pub const ACCENT_NEGATIVE: Color = Color::Rgb(200, 100, 100);
