//! Observable application state types.
//!
//! The "view model" of the client: login form, focus and overlays. Records
//! owned by the server ([`Room`](huddle_proto::Room),
//! [`Message`](huddle_proto::Message)) are stored as received.

use huddle_proto::{RoomId, User};

use crate::TextInput;

/// Authentication phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Login form shown.
    Unauthenticated(LoginForm),
    /// Logged in.
    Authenticated(User),
}

/// Login form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Display name.
    pub username: TextInput,
    /// Admin password. Only used while admin fields are shown.
    pub admin_password: TextInput,
    /// Admin login requested.
    pub show_admin_fields: bool,
    /// Field receiving keystrokes.
    pub field: LoginField,
}

impl LoginForm {
    /// Field receiving keystrokes.
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.admin_password,
        }
    }
}

/// Login form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    /// Display name.
    #[default]
    Username,
    /// Admin password.
    Password,
}

/// Main-screen pane receiving keystrokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// Room list.
    #[default]
    Rooms,
    /// Message composer.
    Composer,
}

/// Modal shown over the main screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Confirm joining a room for the first time.
    JoinPrompt {
        /// Room awaiting confirmation.
        room_id: RoomId,
    },
    /// Create-room dialog with its name field.
    CreateRoom(TextInput),
}
