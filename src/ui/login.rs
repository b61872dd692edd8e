//! Logged-out panel: the login form.

use crate::app::{App, LoginField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let form_width = 50.min(area.width);
    let form_height = 8.min(area.height);
    let form_area = Rect {
        x: area.x + (area.width - form_width) / 2,
        y: area.y + (area.height - form_height) / 2,
        width: form_width,
        height: form_height,
    };

    let masked: String = "*".repeat(app.login_form.password.chars().count());
    let lines = vec![
        Line::from(""),
        field_line(
            "Email",
            &app.login_form.email,
            app.login_form.field == LoginField::Email,
        ),
        field_line(
            "Password",
            &masked,
            app.login_form.field == LoginField::Password,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] switch  [Enter] log in  [Esc] quit",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default().borders(Borders::ALL).title(" tidings ");
    f.render_widget(Paragraph::new(lines).block(block), form_area);
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
        Span::styled(
            format!("{:<10}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, value_style),
    ])
}
