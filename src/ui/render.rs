//! Top-level render dispatch.
//!
//! Exactly one of the three regions — splash, logged-out panel, logged-in
//! panel — is drawn per frame, derived from state; the add-subscription
//! dialog overlays independently on top.

use crate::app::{App, DialogField, Region, SubscribeDialog};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{items, login};

/// Minimum terminal dimensions required for normal operation.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 8;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-size areas to prevent layout panics.
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.region() {
        Region::Splash => render_splash(f, app, area),
        Region::LoggedOut => login::render(f, app, area),
        Region::LoggedIn => items::render(f, app, area),
    }

    if let Some(dialog) = app.subscribe_dialog.as_ref() {
        render_subscribe_overlay(f, dialog, area);
    }
}

/// Full-screen overlay shown during blocking operations: initial load,
/// refresh, subscription add.
fn render_splash(f: &mut Frame, app: &App, area: Rect) {
    let text = app.splash.as_deref().unwrap_or("Loading...");
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    let splash = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(splash, vertical[1]);
}

/// Centered rect helper for overlays.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "> " } else { "  " };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<8}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}

fn render_subscribe_overlay(f: &mut Frame, dialog: &SubscribeDialog, area: Rect) {
    let overlay = centered_rect(60, 9, area);
    f.render_widget(Clear, overlay);

    let lines = vec![
        field_line("Link", &dialog.link, dialog.field == DialogField::Link),
        field_line("Title", &dialog.title, dialog.field == DialogField::Title),
        field_line("Folder", &dialog.folder, dialog.field == DialogField::Folder),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] next field  [Enter] add  [Esc] cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add Subscription ");
    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, overlay);
}
