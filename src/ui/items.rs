//! Logged-in panel: the unread item list, the expanded body pane, and the
//! key-hint footer.
//!
//! Visual state is derived, never stored: the open item gets the highlight,
//! read items are dimmed, everything else is bold-unread. The body pane
//! appears only for the open item when expanded.

use crate::app::App;
use crate::util::{summary_to_text, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Columns reserved for the feed name on each row.
const FEED_COLUMN: usize = 20;

/// Format a publish timestamp as a short relative age.
fn format_relative_time(timestamp: Option<i64>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let diff = Utc::now().timestamp() - ts;
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let show_body = app.expand_item && app.open_item.is_some();

    let constraints = if show_body {
        vec![
            Constraint::Percentage(45),
            Constraint::Min(5),
            Constraint::Length(1),
        ]
    } else {
        vec![Constraint::Min(3), Constraint::Length(1)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let list_area = chunks[0];
    render_list(f, app, list_area);

    if show_body {
        render_body(f, app, chunks[1]);
    }

    let footer_area = *chunks.last().unwrap_or(&area);
    render_footer(f, app, footer_area);
}

fn render_list(f: &mut Frame, app: &mut App, area: Rect) {
    // The renderer owns the viewport geometry; the state machine reads it
    // back for scroll and near-bottom decisions.
    let rows = area.height.saturating_sub(2) as usize;
    app.viewport_rows = rows;
    if !app.items.is_empty() && app.list_offset >= app.items.len() {
        app.list_offset = app.items.len() - 1;
    }

    let width = area.width.saturating_sub(2) as usize;
    let title_width = width.saturating_sub(FEED_COLUMN + 8);

    let rendered: Vec<ListItem> = if app.items.is_empty() {
        vec![ListItem::new("Nothing left")]
    } else {
        app.items
            .iter()
            .enumerate()
            .skip(app.list_offset)
            .take(rows)
            .map(|(i, item)| {
                let is_open = app.open_item == Some(i);
                let title_style = if is_open {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else if item.is_read() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };

                let feed = truncate_to_width(&item.origin.title, FEED_COLUMN);
                let mut spans = vec![Span::styled(
                    format!("{:<width$} ", feed, width = FEED_COLUMN),
                    Style::default().fg(Color::Gray),
                )];
                spans.push(Span::styled(
                    truncate_to_width(&item.title, title_width).into_owned(),
                    title_style,
                ));

                let age = format_relative_time(item.published);
                if !age.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", age),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let title = if app.has_more_pages() {
        format!(" Unread ({}+) ", app.items.len())
    } else {
        format!(" Unread ({}) ", app.items.len())
    };
    let list = List::new(rendered).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn render_body(f: &mut Frame, app: &App, area: Rect) {
    let Some(item) = app.open_item.and_then(|i| app.items.get(i)) else {
        return;
    };
    let width = area.width.saturating_sub(2) as usize;
    let text = summary_to_text(&item.summary.content, width);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", truncate_to_width(&item.title, width.saturating_sub(4))));
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let text = if app.is_loading_next_page {
        "Loading more..."
    } else {
        "[j/k] select  [e] expand  [v] browser  [r] refresh  [z] read to here  [A] all read  [a] subscribe  [q] quit"
    };
    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
