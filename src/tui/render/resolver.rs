//! The three synchronized conflict panes: local, result, incoming

use std::ops::Range;

use crate::app::App;
use crate::conflict::{Hunk, ResolverSession, View, ViewLines, is_marker_line};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::colors;

/// Lines of context kept above the selected hunk
const CONTEXT: usize = 3;

/// Render the header line and the three panes
pub fn render_resolver(frame: &mut Frame<'_>, app: &App, session: &ResolverSession, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_header(frame, app, session, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[1]);

    let (ours_label, theirs_label) = session.current().map_or(("", ""), |hunk| {
        (hunk.ours_label(), hunk.theirs_label())
    });

    for (view, area, title) in [
        (View::Local, panes[0], pane_title("Local", ours_label)),
        (View::Result, panes[1], " Result ".to_string()),
        (View::Incoming, panes[2], pane_title("Incoming", theirs_label)),
    ] {
        render_pane(frame, app, session, view, title, area);
    }
}

fn pane_title(name: &str, label: &str) -> String {
    if label.is_empty() {
        format!(" {name} ")
    } else {
        format!(" {name} ({label}) ")
    }
}

fn render_header(frame: &mut Frame<'_>, app: &App, session: &ResolverSession, area: Rect) {
    let total = session.hunks().len();
    let cursor = session.cursor();
    let state = session.current().map_or_else(
        || Span::raw(""),
        |hunk| match hunk.resolution() {
            Some(resolution) => Span::styled(
                format!(" {} ", resolution.label()),
                Style::default().fg(colors::RESOLVED),
            ),
            None => Span::styled(
                " unresolved ",
                Style::default()
                    .fg(colors::UNRESOLVED)
                    .add_modifier(Modifier::BOLD),
            ),
        },
    );

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.display_path(session.path()).display()),
            Style::default()
                .fg(colors::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" conflict {}/{total} ", cursor + 1),
            Style::default().fg(colors::TEXT_DIM),
        ),
        state,
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors::SURFACE)),
        area,
    );
}

/// First line shown in a pane: the selected hunk minus some context, shifted by the user's scroll
fn pane_offset(view: &ViewLines, cursor: usize, scroll: isize) -> usize {
    let anchor = view.spans.get(cursor).map_or(0, |span| span.start);
    anchor
        .saturating_add_signed(scroll)
        .saturating_sub(CONTEXT)
        .min(view.lines.len().saturating_sub(1))
}

fn hunk_at(spans: &[Range<usize>], line: usize) -> Option<usize> {
    spans.iter().position(|span| span.contains(&line))
}

fn side_color(view: View, hunk: &Hunk) -> Color {
    match view {
        View::Local => colors::OURS,
        View::Incoming => colors::THEIRS,
        View::Result if hunk.is_resolved() => colors::RESOLVED,
        View::Result => colors::UNRESOLVED,
    }
}

fn render_pane(
    frame: &mut Frame<'_>,
    app: &App,
    session: &ResolverSession,
    view: View,
    title: String,
    area: Rect,
) {
    let lines = session.view(view);
    let height = usize::from(area.height.saturating_sub(2));
    let offset = pane_offset(&lines, session.cursor(), app.scroll);
    let gutter = lines.lines.len().to_string().len();

    let text: Vec<Line<'_>> = lines
        .lines
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(number, content)| {
            let hunk = hunk_at(&lines.spans, number)
                .and_then(|index| session.hunk(index).map(|hunk| (index, hunk)));
            let style = match hunk {
                None => Style::default().fg(colors::TEXT_PRIMARY),
                Some((_, hunk))
                    if view == View::Result && !hunk.is_resolved() && is_marker_line(content) =>
                {
                    Style::default()
                        .fg(colors::MARKER)
                        .add_modifier(Modifier::BOLD)
                }
                Some((index, hunk)) if index == session.cursor() => Style::default()
                    .fg(side_color(view, hunk))
                    .bg(colors::SURFACE_HIGHLIGHT),
                Some((_, hunk)) => Style::default().fg(side_color(view, hunk)),
            };
            Line::from(vec![
                Span::styled(
                    format!("{:>gutter$} ", number + 1),
                    Style::default().fg(colors::TEXT_MUTED),
                ),
                Span::styled(content.as_str(), style),
            ])
        })
        .collect();

    let border_color = if view == View::Result {
        colors::SELECTED
    } else {
        colors::BORDER
    };
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .border_type(colors::BORDER_TYPE)
            .style(Style::default().bg(colors::SURFACE)),
    );
    frame.render_widget(paragraph, area);
}
