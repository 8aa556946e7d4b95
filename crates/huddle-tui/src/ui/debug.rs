//! Debug trace pane.

use huddle_app::DebugLog;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

const BORDER_SIZE: u16 = 2;

/// Render the most recent trace lines that fit.
pub fn render(frame: &mut Frame, log: &DebugLog, area: Rect) {
    let block = Block::bordered().title(" Debug Log ").border_style(Style::default().fg(Color::DarkGray));

    let visible = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = log.len().saturating_sub(visible);
    let lines: Vec<Line> = log
        .entries()
        .iter()
        .skip(skip)
        .map(|entry| {
            Line::from(vec![
                Span::styled(entry.timestamp(), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::raw(entry.message.as_str()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
