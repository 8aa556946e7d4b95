//! Message composer
//!
//! Draft field plus the admin-send checkbox for room owners.

use huddle_app::{App, Focus};
use huddle_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph},
};

/// Render the composer.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let focused = app.focus() == Focus::Composer;
    let enabled = app.selected_room().is_some();
    let border = if focused { Color::Yellow } else { Color::DarkGray };

    let mut block = Block::bordered().title(" Message ").border_style(Style::default().fg(border));
    if app.can_toggle_admin_send() {
        let mark = if app.send_as_admin() { "x" } else { " " };
        block = block.title_bottom(Line::from(format!(" [{mark}] Send as Admin (Ctrl-A) ")).right_aligned());
    }

    let paragraph = if enabled || !app.draft().text().is_empty() {
        Paragraph::new(app.draft().text())
    } else {
        Paragraph::new("Select a room first").style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(paragraph.block(block), area);

    if focused {
        let inner_width = area.width.saturating_sub(2);
        let offset = u16::try_from(app.draft().cursor()).unwrap_or(u16::MAX).min(inner_width.saturating_sub(1));
        frame.set_cursor_position((area.x.saturating_add(1).saturating_add(offset), area.y.saturating_add(1)));
    }
}
