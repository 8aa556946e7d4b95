//! Overlays
//!
//! Join prompt, create-room dialog and the blocking alert. The alert draws
//! last so it covers any overlay.

use huddle_app::{App, Overlay};
use huddle_core::Environment;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Clear, Paragraph, Wrap},
};

use super::{centered, render_field};

const DIALOG_WIDTH: u16 = 50;

/// Render whatever overlay is visible.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>) {
    let area = frame.area();

    match app.overlay() {
        Some(Overlay::JoinPrompt { room_id }) => {
            let name = app
                .rooms()
                .iter()
                .find(|room| &room.id == room_id)
                .map_or_else(|| room_id.to_string(), |room| room.name.clone());
            render_join_prompt(frame, area, &name);
        },
        Some(Overlay::CreateRoom(name)) => {
            let dialog = open_dialog(frame, area, " Create New Room ", 7);
            let [field_area, hint_area] =
                Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(dialog);
            render_field(frame, field_area, "Room name", name, app.alert().is_none(), false);
            frame.render_widget(hint("Enter: create  Esc: cancel"), hint_area);
        },
        None => {},
    }

    if let Some(alert) = app.alert() {
        let dialog = open_dialog(frame, area, " Alert ", 6);
        let [text_area, hint_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(dialog);
        frame.render_widget(Paragraph::new(alert).wrap(Wrap { trim: true }), text_area);
        frame.render_widget(hint("Enter: OK"), hint_area);
    }
}

fn render_join_prompt(frame: &mut Frame, area: Rect, name: &str) {
    let dialog = open_dialog(frame, area, " Join Room ", 5);
    let [question_area, hint_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(dialog);

    let question = Paragraph::new(Line::from(format!("Do you want to join \"{name}\"?")).centered())
        .wrap(Wrap { trim: true });
    frame.render_widget(question, question_area);
    frame.render_widget(hint("Enter/y: join  Esc/n: cancel"), hint_area);
}

/// Clear a centred box, draw its border and return the inner area.
fn open_dialog(frame: &mut Frame, area: Rect, title: &str, height: u16) -> Rect {
    let dialog = centered(area, DIALOG_WIDTH, height);
    let block = Block::bordered().title(Line::from(title).centered()).border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(dialog);

    frame.render_widget(Clear, dialog);
    frame.render_widget(block, dialog);
    inner
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(text).centered()).style(Style::default().fg(Color::DarkGray))
}
