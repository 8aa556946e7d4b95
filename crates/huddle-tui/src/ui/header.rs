//! Header bar
//!
//! Connection indicator and the logged-in user.

use huddle_app::App;
use huddle_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the header bar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let indicator = if app.connection().connected {
        Span::styled("● Connected", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("● Disconnected", Style::default().fg(Color::Red))
    };

    let mut spans = vec![Span::raw(" "), indicator];
    if let Some(user) = app.user() {
        spans.push(Span::raw(format!("  Logged in as: {}", user.name)));
        if user.is_admin {
            spans.push(Span::styled(" (Admin)", Style::default().fg(Color::Magenta)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(paragraph, area);
}
