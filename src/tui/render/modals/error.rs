//! Error and success modal rendering

use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect_absolute;
use crate::tui::render::colors;

/// Width available for text inside the modal
const MAX_LINE_WIDTH: usize = 56;

/// Most message lines shown before the rest is elided
const MAX_MESSAGE_LINES: usize = 16;

/// Word-wrap `message`, keeping its own line breaks
fn wrap_message(message: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    for paragraph in message.lines() {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                wrapped.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
            }
        }
        wrapped.push(current_line);
    }
    wrapped
}

fn render_message_modal(
    frame: &mut Frame<'_>,
    title: &str,
    header: &str,
    color: Color,
    message: &str,
) {
    let mut lines: Vec<Line<'_>> = vec![
        Line::from(Span::styled(
            header.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let mut body = wrap_message(message, MAX_LINE_WIDTH);
    if body.len() > MAX_MESSAGE_LINES {
        let hidden = body.len() - MAX_MESSAGE_LINES;
        body.truncate(MAX_MESSAGE_LINES);
        body.push(format!("… {hidden} more line(s) in the log"));
    }
    lines.extend(body.into_iter().map(|line| {
        Line::from(Span::styled(line, Style::default().fg(colors::TEXT_PRIMARY)))
    }));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to dismiss",
        Style::default().fg(colors::TEXT_MUTED),
    )));

    // Height: content lines + 2 for borders, min 7 lines
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX).max(7);
    let area = centered_rect_absolute(60, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().bg(colors::MODAL_BG))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Render an error modal with word-wrapped message
pub fn render_error_modal(frame: &mut Frame<'_>, message: &str) {
    render_message_modal(frame, "Error", "✖ Error", colors::MODAL_BORDER_ERROR, message);
}

/// Render a success modal with word-wrapped message
pub fn render_success_modal(frame: &mut Frame<'_>, message: &str) {
    render_message_modal(frame, "Done", "✔ Done", colors::ACCENT_POSITIVE, message);
}
