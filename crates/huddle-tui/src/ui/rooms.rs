//! Room list
//!
//! Every known room with ownership and joined markers. The cursor row is
//! highlighted while the list has focus.

use huddle_app::{App, Focus};
use huddle_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState},
};

const OWNER_MARKER: &str = " (Owner)";
const JOINED_MARKER: &str = " (Joined)";

/// Render the room list.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let focused = app.focus() == Focus::Rooms;
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::bordered().title(" Rooms ").border_style(Style::default().fg(border));

    if app.rooms().is_empty() {
        let empty = ListItem::new(Span::styled("No rooms available", Style::default().fg(Color::DarkGray)));
        frame.render_widget(List::new([empty]).block(block), area);
        return;
    }

    let user = app.user();
    let items: Vec<ListItem> = app
        .rooms()
        .iter()
        .map(|room| {
            let owned = user.is_some_and(|user| room.is_owned_by(&user.id));
            let marker = if owned {
                OWNER_MARKER
            } else if !app.is_admin() && app.is_joined(&room.id) {
                JOINED_MARKER
            } else {
                ""
            };

            let style = if app.selected_room() == Some(&room.id) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("# {}", room.name), style),
                Span::styled(marker, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.room_cursor()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
