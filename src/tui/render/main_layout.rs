//! File picker and status bar

use crate::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};

use super::colors;

/// Render the list of conflicted files
pub fn render_picker(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let border_color = if app.mode == Mode::Normal {
        colors::SELECTED
    } else {
        colors::BORDER
    };
    let block = Block::default()
        .title(format!(" Conflicted files ({}) ", app.files.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(colors::BORDER_TYPE)
        .style(Style::default().bg(colors::SURFACE));

    if app.files.is_empty() {
        let sync_key = app.config.keys.format_keys(crate::config::Action::Sync);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No conflicted files.",
                Style::default().fg(colors::TEXT_PRIMARY),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Press {sync_key} to rebase this branch onto {} and merge it.",
                    app.config.main_branch
                ),
                Style::default().fg(colors::TEXT_DIM),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem<'_>> = app
        .files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let style = if i == app.selected_file {
                Style::default()
                    .fg(colors::SELECTED)
                    .bg(colors::SURFACE_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::TEXT_PRIMARY)
            };
            ListItem::new(Line::from(vec![
                Span::styled(" ✖ ", Style::default().fg(colors::UNRESOLVED)),
                Span::styled(file.as_str(), style),
            ]))
        })
        .collect();

    let visible_height = usize::from(area.height.saturating_sub(2));
    let max_scroll = app.files.len().saturating_sub(visible_height);
    let scroll = app
        .selected_file
        .saturating_sub(visible_height.saturating_sub(1))
        .min(max_scroll);

    let list = List::new(items).block(block);
    let mut state = ListState::default()
        .with_offset(scroll)
        .with_selected(Some(app.selected_file));
    frame.render_stateful_widget(list, area, &mut state);

    if app.files.len() > visible_height && area.width != 0 {
        let scrollbar_area = area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        });
        if scrollbar_area.width != 0 && scrollbar_area.height != 0 {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .track_symbol(Some("░"))
                .track_style(Style::default().fg(colors::TEXT_MUTED))
                .thumb_style(Style::default().fg(colors::TEXT_PRIMARY));
            let mut scrollbar_state = ScrollbarState::new(max_scroll.saturating_add(1))
                .position(scroll)
                .viewport_content_length(visible_height);
            frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
        }
    }
}

/// Render the one-line status bar
pub fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hints = if app.session.is_some() {
        app.config.keys.resolver_hints()
    } else {
        app.config.keys.picker_hints()
    };

    let left_content = app.status_message.as_ref().map_or_else(
        || Span::styled(format!(" {hints} "), Style::default().fg(colors::TEXT_DIM)),
        |status| Span::styled(format!(" {status} "), Style::default().fg(colors::OURS)),
    );

    let right_text = app.session.as_ref().map_or_else(
        || app.root.display().to_string(),
        |session| {
            let unresolved = session.unresolved_count();
            if unresolved == 0 {
                "all resolved".to_string()
            } else {
                format!("{unresolved} unresolved")
            }
        },
    );
    let right_style = if app.session.as_ref().is_some_and(|s| !s.is_fully_resolved()) {
        Style::default()
            .fg(colors::UNRESOLVED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::TEXT_DIM)
    };

    let right_width = u16::try_from(right_text.chars().count().saturating_add(2))
        .unwrap_or(0)
        .min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    let left = Paragraph::new(Line::from(left_content)).style(Style::default().bg(colors::SURFACE));
    frame.render_widget(left, chunks[0]);

    let right = Paragraph::new(Line::from(Span::styled(
        format!(" {right_text} "),
        right_style,
    )))
    .style(Style::default().bg(colors::SURFACE))
    .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}
