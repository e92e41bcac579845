//! Sync progress and running follow-up overlays

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect_absolute;
use crate::app::{StepState, SyncProgress};
use crate::conflict::FollowUp;
use crate::tui::render::colors;

fn step_line(number: usize, label: &str, state: StepState) -> Line<'static> {
    let (icon, color) = match state {
        StepState::Running => ("▶", colors::UNRESOLVED),
        StepState::Done => ("✔", colors::ACCENT_POSITIVE),
        StepState::Failed => ("✖", colors::ACCENT_NEGATIVE),
    };
    let label_style = if state == StepState::Running {
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::TEXT_PRIMARY)
    };
    Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(format!("{number}. "), Style::default().fg(colors::TEXT_DIM)),
        Span::styled(label.to_string(), label_style),
    ])
}

/// Render the list of sync steps seen so far
pub fn render_sync_overlay(frame: &mut Frame<'_>, sync: &SyncProgress) {
    let mut lines: Vec<Line<'_>> = sync
        .steps
        .iter()
        .enumerate()
        .map(|(i, (label, state))| step_line(i + 1, label, *state))
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " Checking branches…",
            Style::default().fg(colors::TEXT_DIM),
        )));
    }
    let remaining = sync.total.saturating_sub(sync.steps.len());
    if remaining > 0 {
        lines.push(Line::from(Span::styled(
            format!("   {remaining} more step(s)"),
            Style::default().fg(colors::TEXT_MUTED),
        )));
    }

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = centered_rect_absolute(60, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" Syncing {} into {} ", sync.feature, sync.main))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MODAL_BORDER)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Render a notice while a follow-up git command runs
pub fn render_running_overlay(frame: &mut Frame<'_>, follow_up: FollowUp) {
    let command = crate::command::join_args("git", &follow_up.args());
    let lines = vec![Line::from(vec![
        Span::styled(" ▶ ", Style::default().fg(colors::UNRESOLVED)),
        Span::styled(command, Style::default().fg(colors::TEXT_PRIMARY)),
    ])];

    let area = centered_rect_absolute(50, 3, frame.area());
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", follow_up.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MODAL_BORDER)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
