//! Application state machine.
//!
//! [`App`] owns all session state: login form, room list, selected room,
//! message list, joined-room memory, composer and debug trace. It is a pure
//! state machine: it consumes [`AppEvent`]s and intent calls and produces
//! [`AppAction`]s for the runtime to execute. The only outside dependency is
//! the [`Environment`] clock, used for trace timestamps and synthetic message
//! ids.
//!
//! # Phases
//!
//! ```text
//! ┌─────────────────┐ LoginSucceeded ┌───────────────┐ select_room ┌───────────────┐
//! │ Unauthenticated │───────────────>│ No room       │────────────>│ Room selected │
//! └─────────────────┘                └───────────────┘             └───────────────┘
//!         ↑ LoginFailed                                              │ select_room
//!         └─ (stays)                                                 └──> (switch)
//! ```
//!
//! # Join policy
//!
//! Administrators join immediately. Others rejoin immediately when the room
//! was joined earlier in the session, and see a confirmation prompt otherwise.

use std::collections::HashSet;

use huddle_core::{ConnectionStatus, Environment, SocketEvent};
use huddle_proto::{
    ClientEvent, CreateRoom, JoinRoom, LoginRequest, Message, MessageId, Room, RoomId, RoomJoined, SendMessage,
    ServerEvent, User,
};

use crate::{
    AppAction, AppEvent, DebugLog, KeyInput, TextInput,
    state::{Focus, LoginField, LoginForm, Overlay, Session},
};

/// Characters of a new message shown in the debug trace.
const PREVIEW_CHARS: usize = 20;

/// Application state machine.
#[derive(Debug, Clone)]
pub struct App<E> {
    env: E,
    session: Session,
    rooms: Vec<Room>,
    /// Highlighted entry in the room list.
    room_cursor: usize,
    selected_room: Option<RoomId>,
    /// Messages of the selected room, in arrival order.
    messages: Vec<Message>,
    joined_rooms: HashSet<RoomId>,
    draft: TextInput,
    /// Per-message admin attribution toggle.
    send_as_admin: bool,
    focus: Focus,
    overlay: Option<Overlay>,
    /// Blocking alert. Swallows input until dismissed.
    alert: Option<String>,
    debug_log: DebugLog,
    connection: ConnectionStatus,
    rooms_requested: bool,
}

impl<E: Environment> App<E> {
    /// Create an unauthenticated App.
    pub fn new(env: E) -> Self {
        Self {
            env,
            session: Session::Unauthenticated(LoginForm::default()),
            rooms: Vec::new(),
            room_cursor: 0,
            selected_room: None,
            messages: Vec::new(),
            joined_rooms: HashSet::new(),
            draft: TextInput::new(),
            send_as_admin: false,
            focus: Focus::default(),
            overlay: None,
            alert: None,
            debug_log: DebugLog::new(),
            connection: ConnectionStatus::disconnected(),
            rooms_requested: false,
        }
    }

    /// Issue the one-time directory fetch.
    pub fn start(&mut self) -> Vec<AppAction> {
        if self.rooms_requested {
            return vec![AppAction::Render];
        }
        self.rooms_requested = true;
        self.log("Fetching rooms...");
        vec![AppAction::FetchRooms, AppAction::Render]
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(..) => vec![AppAction::Render],
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Socket(SocketEvent::Status(status)) => {
                self.log(format!("Socket connected: {}", status.connected));
                self.connection = status;
                vec![AppAction::Render]
            },
            AppEvent::Socket(SocketEvent::Server(event)) => self.handle_server_event(event),
            AppEvent::Socket(SocketEvent::Malformed { event, reason }) => {
                self.log(format!("Ignoring malformed {event} event: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::RoomsFetched(rooms) => {
                self.log(format!("Received {} rooms", rooms.len()));
                self.rooms = rooms;
                self.clamp_cursor();
                vec![AppAction::Render]
            },
            AppEvent::RoomsFetchFailed { reason } => {
                self.log(format!("Error fetching rooms: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::LoginSucceeded(user) => {
                let admin_suffix = if user.is_admin { " (Admin)" } else { "" };
                self.log(format!("Login successful. User ID: {}{admin_suffix}", user.id));
                self.send_as_admin = user.is_admin;
                self.focus = Focus::Rooms;
                self.session = Session::Authenticated(user);
                vec![AppAction::Render]
            },
            AppEvent::LoginFailed { reason } => {
                self.log(format!("Login error: {reason}"));
                self.alert = Some("Failed to login. Please try again.".into());
                vec![AppAction::Render]
            },
            AppEvent::EmitFailed { event, reason } => {
                self.log(format!("Failed to emit {event}: {reason}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_server_event(&mut self, event: ServerEvent) -> Vec<AppAction> {
        match event {
            ServerEvent::RoomJoined(RoomJoined { room, messages }) => {
                self.log(format!("Joined room: {}", room.name));
                self.log(format!("Received {} messages", messages.len()));

                // Acknowledgments for a room the user already left are stale.
                // The join counts once its history is actually shown.
                if self.selected_room.as_ref() == Some(&room.id) {
                    let first_join = self.joined_rooms.insert(room.id.clone());
                    self.messages = messages;
                    if first_join {
                        let notice = self.join_notice();
                        self.messages.push(notice);
                    }
                }
                vec![AppAction::Render]
            },
            ServerEvent::NewMessage(message) => {
                let preview: String = message.text.chars().take(PREVIEW_CHARS).collect();
                self.log(format!("New message received: {preview}..."));

                let belongs = match (&self.selected_room, &message.room_id) {
                    (Some(_), None) => true,
                    (Some(selected), Some(room)) => selected == room,
                    (None, _) => false,
                };
                if belongs {
                    self.messages.push(message);
                }
                vec![AppAction::Render]
            },
            ServerEvent::RoomCreated(room) => {
                self.log(format!("New room created: {}", room.name));
                self.prepend_room(room);
                vec![AppAction::Render]
            },
            ServerEvent::RoomCreationSuccess(room) => {
                self.log(format!("You created room: {}", room.name));
                if matches!(self.overlay, Some(Overlay::CreateRoom(_))) {
                    self.overlay = None;
                }
                self.joined_rooms.insert(room.id.clone());
                self.prepend_room(room);
                vec![AppAction::Render]
            },
            ServerEvent::Error(text) => {
                self.log(format!("Socket error: {text}"));
                self.alert = Some(format!("Error: {text}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Route a key press.
    ///
    /// Precedence: `Ctrl-C`, alert, overlay, then the current screen.
    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Ctrl('c') {
            return self.quit();
        }

        if self.alert.is_some() {
            return match key {
                KeyInput::Enter | KeyInput::Esc => self.dismiss_alert(),
                _ => vec![],
            };
        }

        match &mut self.overlay {
            Some(Overlay::JoinPrompt { .. }) => {
                return match key {
                    KeyInput::Enter | KeyInput::Char('y' | 'Y') => self.confirm_join(),
                    KeyInput::Esc | KeyInput::Char('n' | 'N') => self.cancel_join(),
                    _ => vec![],
                };
            },
            Some(Overlay::CreateRoom(name)) => {
                return match key {
                    KeyInput::Enter => self.submit_create_room(),
                    KeyInput::Esc => self.close_create_room(),
                    _ if name.handle_key(key) => vec![AppAction::Render],
                    _ => vec![],
                };
            },
            None => {},
        }

        match &mut self.session {
            Session::Unauthenticated(form) => match key {
                KeyInput::Enter => self.submit_login(),
                KeyInput::Esc => self.quit(),
                KeyInput::Ctrl('a') => self.toggle_admin_fields(),
                KeyInput::Tab => {
                    if form.show_admin_fields {
                        form.field = match form.field {
                            LoginField::Username => LoginField::Password,
                            LoginField::Password => LoginField::Username,
                        };
                    }
                    vec![AppAction::Render]
                },
                _ if form.focused_mut().handle_key(key) => vec![AppAction::Render],
                _ => vec![],
            },
            Session::Authenticated(_) => self.handle_main_key(key),
        }
    }

    fn handle_main_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => return self.quit(),
            KeyInput::Tab => {
                self.focus = match self.focus {
                    Focus::Rooms => Focus::Composer,
                    Focus::Composer => Focus::Rooms,
                };
                return vec![AppAction::Render];
            },
            KeyInput::Ctrl('n') => return self.open_create_room(),
            KeyInput::Ctrl('a') => return self.toggle_admin_send(),
            _ => {},
        }

        match self.focus {
            Focus::Rooms => match key {
                KeyInput::Up => {
                    self.room_cursor = self.room_cursor.saturating_sub(1);
                    vec![AppAction::Render]
                },
                KeyInput::Down => {
                    if self.room_cursor.saturating_add(1) < self.rooms.len() {
                        self.room_cursor = self.room_cursor.saturating_add(1);
                    }
                    vec![AppAction::Render]
                },
                KeyInput::Enter => match self.rooms.get(self.room_cursor) {
                    Some(room) => {
                        let room_id = room.id.clone();
                        self.select_room(&room_id)
                    },
                    None => vec![],
                },
                _ => vec![],
            },
            Focus::Composer => match key {
                KeyInput::Enter => self.send_message(),
                _ if self.draft.handle_key(key) => vec![AppAction::Render],
                _ => vec![],
            },
        }
    }

    /// Validate the login form and request a login.
    pub fn submit_login(&mut self) -> Vec<AppAction> {
        let Session::Unauthenticated(form) = &self.session else {
            return vec![];
        };

        if form.username.is_blank() {
            self.alert = Some("Please enter a username".into());
            return vec![AppAction::Render];
        }
        if form.show_admin_fields && form.admin_password.is_blank() {
            self.alert = Some("Please enter admin password".into());
            return vec![AppAction::Render];
        }

        let request = LoginRequest {
            name: form.username.text().to_owned(),
            is_admin: form.show_admin_fields,
            admin_password: form.show_admin_fields.then(|| form.admin_password.text().to_owned()),
        };
        vec![AppAction::Login(request), AppAction::Render]
    }

    /// Show or hide the admin login fields.
    ///
    /// Hiding them clears the password.
    pub fn toggle_admin_fields(&mut self) -> Vec<AppAction> {
        let Session::Unauthenticated(form) = &mut self.session else {
            return vec![];
        };

        form.show_admin_fields = !form.show_admin_fields;
        if !form.show_admin_fields {
            form.admin_password.clear();
            form.field = LoginField::Username;
        }
        vec![AppAction::Render]
    }

    /// Select a room, applying the join policy.
    ///
    /// Unknown rooms and unauthenticated calls are ignored.
    pub fn select_room(&mut self, room_id: &RoomId) -> Vec<AppAction> {
        let Session::Authenticated(user) = &self.session else {
            return vec![];
        };
        if !self.rooms.iter().any(|room| &room.id == room_id) {
            return vec![];
        }

        if user.is_admin {
            return self.join_room(room_id.clone());
        }

        if self.joined_rooms.contains(room_id) {
            self.log(format!("Rejoining previously joined room {room_id}"));
            return self.join_room(room_id.clone());
        }

        self.overlay = Some(Overlay::JoinPrompt { room_id: room_id.clone() });
        vec![AppAction::Render]
    }

    /// Accept the join prompt.
    pub fn confirm_join(&mut self) -> Vec<AppAction> {
        match self.overlay.take() {
            Some(Overlay::JoinPrompt { room_id }) => self.join_room(room_id),
            other => {
                self.overlay = other;
                vec![]
            },
        }
    }

    /// Dismiss the join prompt without joining.
    pub fn cancel_join(&mut self) -> Vec<AppAction> {
        if matches!(self.overlay, Some(Overlay::JoinPrompt { .. })) {
            self.overlay = None;
        }
        vec![AppAction::Render]
    }

    fn join_room(&mut self, room_id: RoomId) -> Vec<AppAction> {
        let Session::Authenticated(user) = &self.session else {
            return vec![];
        };
        let event = ClientEvent::JoinRoom(JoinRoom {
            room_id: room_id.clone(),
            user_id: user.id.clone(),
            username: user.name.clone(),
        });
        let is_admin = user.is_admin;

        self.log(format!("Joining room {room_id}..."));
        if self.selected_room.as_ref() != Some(&room_id) && !is_admin {
            // Ownership differs per room; the toggle never carries over.
            self.send_as_admin = false;
        }
        self.selected_room = Some(room_id);
        self.messages.clear();
        vec![AppAction::Emit(event), AppAction::Render]
    }

    /// Open the create-room dialog.
    pub fn open_create_room(&mut self) -> Vec<AppAction> {
        if !matches!(self.session, Session::Authenticated(_)) {
            return vec![];
        }
        self.overlay = Some(Overlay::CreateRoom(TextInput::new()));
        vec![AppAction::Render]
    }

    /// Close the create-room dialog.
    pub fn close_create_room(&mut self) -> Vec<AppAction> {
        if matches!(self.overlay, Some(Overlay::CreateRoom(_))) {
            self.overlay = None;
        }
        vec![AppAction::Render]
    }

    /// Request creation of the room named in the dialog.
    ///
    /// The dialog stays open until the server confirms.
    pub fn submit_create_room(&mut self) -> Vec<AppAction> {
        let Session::Authenticated(user) = &self.session else {
            return vec![];
        };
        let name = match &self.overlay {
            Some(Overlay::CreateRoom(name)) if !name.is_blank() => name.text().to_owned(),
            _ => {
                self.log("Cannot create room: Missing room name");
                return vec![AppAction::Render];
            },
        };

        let admin_id = user.is_admin.then(|| user.id.clone());
        self.log(format!("Creating room {name}..."));
        vec![AppAction::Emit(ClientEvent::CreateRoom(CreateRoom { name, admin_id })), AppAction::Render]
    }

    /// Flip the admin-send toggle.
    ///
    /// Only effective for a non-admin who owns the selected room.
    pub fn toggle_admin_send(&mut self) -> Vec<AppAction> {
        if !self.can_toggle_admin_send() {
            return vec![];
        }
        self.send_as_admin = !self.send_as_admin;
        vec![AppAction::Render]
    }

    /// Send the draft to the selected room.
    pub fn send_message(&mut self) -> Vec<AppAction> {
        let (user, room_id) = match (&self.session, &self.selected_room) {
            (Session::Authenticated(user), Some(room_id)) if !self.draft.is_blank() => (user, room_id),
            _ => {
                self.log("Cannot send message: Missing required data");
                return vec![AppAction::Render];
            },
        };

        let owns_room = self.selected_room_record().is_some_and(|room| room.is_owned_by(&user.id));
        let is_admin = user.is_admin || (self.send_as_admin && owns_room);
        let event = ClientEvent::SendMessage(SendMessage {
            room_id: room_id.clone(),
            user_id: user.id.clone(),
            text: self.draft.take(),
            is_admin,
        });
        let keep_toggle = user.is_admin;

        let admin_suffix = if is_admin { " as admin" } else { "" };
        self.log(format!("Sending message to room {room_id}{admin_suffix}..."));

        if !keep_toggle {
            self.send_as_admin = false;
        }
        vec![AppAction::Emit(event), AppAction::Render]
    }

    /// Close the alert.
    pub fn dismiss_alert(&mut self) -> Vec<AppAction> {
        self.alert = None;
        vec![AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    fn join_notice(&self) -> Message {
        let now = self.env.now();
        let name = self.user().map_or("", |user| user.name.as_str());
        Message::system(
            MessageId::new(format!("system-join-{}", now.timestamp_millis())),
            format!("{name} has joined the room"),
            now,
        )
    }

    fn prepend_room(&mut self, room: Room) {
        if self.rooms.iter().any(|known| known.id == room.id) {
            return;
        }
        // Keep the highlight on the same room.
        if !self.rooms.is_empty() {
            self.room_cursor = self.room_cursor.saturating_add(1);
        }
        self.rooms.insert(0, room);
    }

    fn clamp_cursor(&mut self) {
        self.room_cursor = self.room_cursor.min(self.rooms.len().saturating_sub(1));
    }

    fn log(&mut self, message: impl Into<String>) {
        let now = self.env.now();
        self.debug_log.push(now, message);
    }

    /// Authentication phase.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Logged-in user. `None` before login.
    pub fn user(&self) -> Option<&User> {
        match &self.session {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated(_) => None,
        }
    }

    /// Login form. `None` after login.
    pub fn login_form(&self) -> Option<&LoginForm> {
        match &self.session {
            Session::Unauthenticated(form) => Some(form),
            Session::Authenticated(_) => None,
        }
    }

    /// Whether the logged-in user is a global administrator.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.is_admin)
    }

    /// Known rooms, newest creations first.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Highlighted entry in the room list.
    pub fn room_cursor(&self) -> usize {
        self.room_cursor
    }

    /// Selected room id. `None` before the first join.
    pub fn selected_room(&self) -> Option<&RoomId> {
        self.selected_room.as_ref()
    }

    /// Selected room record, if it is in the room list.
    pub fn selected_room_record(&self) -> Option<&Room> {
        let selected = self.selected_room.as_ref()?;
        self.rooms.iter().find(|room| &room.id == selected)
    }

    /// Messages of the selected room.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Rooms joined this session.
    pub fn joined_rooms(&self) -> &HashSet<RoomId> {
        &self.joined_rooms
    }

    /// Whether `room_id` was joined this session.
    pub fn is_joined(&self, room_id: &RoomId) -> bool {
        self.joined_rooms.contains(room_id)
    }

    /// Composer contents.
    pub fn draft(&self) -> &TextInput {
        &self.draft
    }

    /// Admin-send toggle.
    pub fn send_as_admin(&self) -> bool {
        self.send_as_admin
    }

    /// Whether the admin-send toggle is offered: non-admin owner of the
    /// selected room.
    pub fn can_toggle_admin_send(&self) -> bool {
        match (self.user(), self.selected_room_record()) {
            (Some(user), Some(room)) => !user.is_admin && room.is_owned_by(&user.id),
            _ => false,
        }
    }

    /// Pane receiving keystrokes on the main screen.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Visible overlay.
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Visible alert.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Debug trace.
    pub fn debug_log(&self) -> &DebugLog {
        &self.debug_log
    }

    /// Latest connection snapshot.
    pub fn connection(&self) -> &ConnectionStatus {
        &self.connection
    }
}
