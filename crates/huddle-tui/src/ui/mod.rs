//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into a frame.

mod chat;
mod composer;
mod debug;
mod header;
mod login;
mod modal;
mod rooms;

use huddle_app::{App, TextInput};
use huddle_core::Environment;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
};

/// Render the entire UI.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>) {
    let area = frame.area();
    match app.login_form() {
        Some(form) => login::render(frame, form, area),
        None => render_main(frame, app, area),
    }

    modal::render(frame, app);
}

/// Header, then rooms | chat | debug columns.
fn render_main<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    const HEADER_HEIGHT: u16 = 1;
    const ROOM_LIST_WIDTH: u16 = 26;
    const CHAT_MIN_WIDTH: u16 = 30;
    const DEBUG_WIDTH: u16 = 40;
    const COMPOSER_HEIGHT: u16 = 3;

    let [header_area, body_area] =
        Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);
    let [rooms_area, chat_column, debug_area] = Layout::horizontal([
        Constraint::Length(ROOM_LIST_WIDTH),
        Constraint::Min(CHAT_MIN_WIDTH),
        Constraint::Length(DEBUG_WIDTH),
    ])
    .areas(body_area);
    let [chat_area, composer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(COMPOSER_HEIGHT)]).areas(chat_column);

    header::render(frame, app, header_area);
    rooms::render(frame, app, rooms_area);
    chat::render(frame, app, chat_area);
    composer::render(frame, app, composer_area);
    debug::render(frame, app.debug_log(), debug_area);
}

/// Bordered single-line text field.
///
/// Places the terminal cursor inside when `focused`.
fn render_field(frame: &mut Frame, area: Rect, title: &str, input: &TextInput, focused: bool, masked: bool) {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::bordered().title(format!(" {title} ")).border_style(Style::default().fg(border));

    let text = if masked { "*".repeat(input.text().chars().count()) } else { input.text().to_owned() };
    frame.render_widget(Paragraph::new(text).block(block), area);

    if focused {
        let inner_width = area.width.saturating_sub(2);
        let offset = u16::try_from(input.cursor()).unwrap_or(u16::MAX).min(inner_width.saturating_sub(1));
        frame.set_cursor_position((area.x.saturating_add(1).saturating_add(offset), area.y.saturating_add(1)));
    }
}

/// Rectangle of at most `width` x `height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x.saturating_add((area.width - width) / 2),
        y: area.y.saturating_add((area.height - height) / 2),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(centered(area, 100, 30), area);
    }
}
