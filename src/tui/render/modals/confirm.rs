//! Confirmation modal rendering

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect_absolute;
use crate::app::ConfirmAction;
use crate::tui::render::colors;

fn primary(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(colors::TEXT_PRIMARY)))
}

fn detail(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(colors::TEXT_DIM)))
}

/// Body text for a pending confirmation
pub fn confirm_lines(action: &ConfirmAction) -> Vec<Line<'static>> {
    match action {
        ConfirmAction::SavePartial { unresolved } => vec![
            primary(format!("Save with {unresolved} unresolved conflict(s)?")),
            Line::from(""),
            Line::from(Span::styled(
                "Conflict markers stay in the file.",
                Style::default().fg(colors::MARKER),
            )),
        ],
        ConfirmAction::FollowUp(follow_up) => vec![primary(follow_up.prompt().to_string())],
        ConfirmAction::Sync { main, feature } => vec![
            primary(format!("Sync {feature} into {main}?")),
            Line::from(""),
            detail(format!("  1. Update {main} and {feature} from their upstreams")),
            detail(format!("  2. Rebase {feature} onto {main}")),
            detail(format!("  3. Merge {feature} into {main}")),
        ],
        ConfirmAction::Discard => vec![
            primary("Close this file?".to_string()),
            Line::from(""),
            detail("Resolutions made so far will be lost.".to_string()),
        ],
        ConfirmAction::Quit => vec![
            primary("Quit?".to_string()),
            Line::from(""),
            detail("The open file has unsaved resolutions.".to_string()),
        ],
    }
}

/// Render a confirmation overlay with yes/no buttons
pub fn render_confirm_overlay(frame: &mut Frame<'_>, mut lines: Vec<Line<'_>>) {
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "[Y]",
            Style::default()
                .fg(colors::ACCENT_POSITIVE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("es  ", Style::default().fg(colors::TEXT_PRIMARY)),
        Span::styled(
            "[N]",
            Style::default()
                .fg(colors::ACCENT_NEGATIVE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("o", Style::default().fg(colors::TEXT_PRIMARY)),
    ]));

    // Height: content lines + 2 for borders
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = centered_rect_absolute(50, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MODAL_BORDER_WARNING)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
