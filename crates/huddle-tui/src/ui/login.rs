//! Login screen
//!
//! Name field, optional masked admin password and the submit hint.

use huddle_app::{LoginField, LoginForm};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
};

use super::{centered, render_field};

const FORM_WIDTH: u16 = 44;
const FIELD_HEIGHT: u16 = 3;

/// Render the login form centred in `area`.
pub fn render(frame: &mut Frame, form: &LoginForm, area: Rect) {
    let password_height = if form.show_admin_fields { FIELD_HEIGHT } else { 0 };
    // Borders + name + password + hint + button.
    let height = 2 + FIELD_HEIGHT + password_height + 2;
    let dialog = centered(area, FORM_WIDTH, height);

    let block = Block::bordered().title(Line::from(" Chat Login ").centered());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let [name_area, password_area, hint_area, button_area] = Layout::vertical([
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(password_height),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    render_field(frame, name_area, "Username", &form.username, form.field == LoginField::Username, false);
    if form.show_admin_fields {
        render_field(
            frame,
            password_area,
            "Admin Password",
            &form.admin_password,
            form.field == LoginField::Password,
            true,
        );
    }

    let hint = if form.show_admin_fields {
        "Ctrl-A: regular login  Tab: switch field"
    } else {
        "Ctrl-A: login as admin"
    };
    frame.render_widget(Paragraph::new(Line::from(hint).centered()).style(Style::default().fg(Color::DarkGray)), hint_area);

    let label = if form.show_admin_fields { "[ Enter as Admin ]" } else { "[ Enter Chat ]" };
    let button = Line::from(label).centered().style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
    frame.render_widget(Paragraph::new(button), button_area);
}
