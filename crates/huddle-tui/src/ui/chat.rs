//! Message list
//!
//! Messages of the selected room, newest at the bottom.

use huddle_app::App;
use huddle_core::Environment;
use huddle_proto::Message;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

const BORDER_SIZE: u16 = 2;

/// Render the message list.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let title = app.selected_room_record().map_or_else(|| " Chat ".to_owned(), |room| format!(" # {} ", room.name));
    let block = Block::bordered().title(title);

    let lines: Vec<Line> = if app.selected_room().is_none() {
        vec![placeholder("Select a room to start chatting")]
    } else if app.messages().is_empty() {
        vec![placeholder("No messages yet.")]
    } else {
        app.messages().iter().map(message_line).collect()
    };

    // Keep the newest messages in view.
    let visible = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = lines.len().saturating_sub(visible);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn placeholder(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))).centered()
}

fn message_line(message: &Message) -> Line<'_> {
    if message.is_system {
        return Line::from(Span::styled(
            message.text.as_str(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
        .centered();
    }

    let mut spans = Vec::with_capacity(4);
    if message.is_admin {
        spans.push(Span::styled("[ADMIN] ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
    }
    let author = message.author_name().unwrap_or("Unknown");
    spans.push(Span::styled(author, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)));
    spans.push(Span::raw(": "));
    spans.push(Span::raw(message.text.as_str()));
    Line::from(spans)
}
