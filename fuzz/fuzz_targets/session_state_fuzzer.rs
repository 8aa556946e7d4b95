//! Fuzz target for the session state machine
//!
//! Drives [`App`] with arbitrary keys, intents and server pushes.
//!
//! # Invariants
//!
//! - NEVER panic, whatever order events arrive in
//! - Admins never see a join prompt
//! - Room cursor stays inside the room list
//! - Messages tagged with a room belong to the selected room

#![no_main]

use arbitrary::Arbitrary;
use chrono::{DateTime, Utc};
use huddle_app::{App, AppEvent, KeyInput, Overlay};
use huddle_core::{SocketEvent, SystemEnv};
use huddle_proto::{Message, MessageId, Room, RoomId, RoomJoined, ServerEvent, User, UserId};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Key {
    Char(char),
    Ctrl(u8),
    Enter,
    Backspace,
    Tab,
    Esc,
    Up,
    Down,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Key(Key),
    Select(u8),
    Confirm,
    Cancel,
    Send,
    ToggleAdminSend,
    Joined { room: u8, history: u8 },
    NewMessage { room: Option<u8> },
    Created(u8),
    CreationSucceeded(u8),
    Error(String),
    Dismiss,
}

#[derive(Debug, Arbitrary)]
struct Session {
    is_admin: bool,
    rooms: u8,
    ops: Vec<Op>,
}

fn room(index: u8) -> Room {
    Room {
        id: RoomId::new(format!("r{index}")),
        name: format!("room {index}"),
        admin_id: (index % 3 == 0).then(|| UserId::from("u1")),
        admin: None,
    }
}

fn message(id: usize, room_id: Option<RoomId>) -> Message {
    let author = User { id: UserId::from("u2"), name: "bob".into(), is_admin: false };
    Message {
        id: MessageId::new(format!("m{id}")),
        text: "hi".into(),
        user_id: Some(author.id.clone()),
        is_system: false,
        is_admin: false,
        user: Some(author),
        room_id,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

fn key(key: Key) -> KeyInput {
    match key {
        Key::Char(c) => KeyInput::Char(c),
        Key::Ctrl(c) => KeyInput::Ctrl(char::from(b'a' + c % 26)),
        Key::Enter => KeyInput::Enter,
        Key::Backspace => KeyInput::Backspace,
        Key::Tab => KeyInput::Tab,
        Key::Esc => KeyInput::Esc,
        Key::Up => KeyInput::Up,
        Key::Down => KeyInput::Down,
    }
}

fn push(app: &mut App<SystemEnv>, event: ServerEvent) {
    let _ = app.handle(AppEvent::Socket(SocketEvent::Server(event)));
}

fuzz_target!(|session: Session| {
    let mut app = App::new(SystemEnv::new());
    let _ = app.start();
    let _ = app.handle(AppEvent::RoomsFetched((0..session.rooms % 8).map(room).collect()));
    let _ = app.handle(AppEvent::LoginSucceeded(User {
        id: UserId::from("u1"),
        name: "alice".into(),
        is_admin: session.is_admin,
    }));

    for (step, op) in session.ops.into_iter().enumerate() {
        match op {
            Op::Key(k) => drop(app.handle(AppEvent::Key(key(k)))),
            Op::Select(index) => drop(app.select_room(&RoomId::new(format!("r{index}")))),
            Op::Confirm => drop(app.confirm_join()),
            Op::Cancel => drop(app.cancel_join()),
            Op::Send => drop(app.send_message()),
            Op::ToggleAdminSend => drop(app.toggle_admin_send()),
            Op::Joined { room: index, history } => {
                let joined = room(index);
                let messages =
                    (0..usize::from(history % 4)).map(|i| message(step * 4 + i, Some(joined.id.clone()))).collect();
                push(&mut app, ServerEvent::RoomJoined(RoomJoined { room: joined, messages }));
            },
            Op::NewMessage { room: index } => {
                let room_id = index.map(|index| room(index).id);
                push(&mut app, ServerEvent::NewMessage(message(step, room_id)));
            },
            Op::Created(index) => push(&mut app, ServerEvent::RoomCreated(room(index))),
            Op::CreationSucceeded(index) => push(&mut app, ServerEvent::RoomCreationSuccess(room(index))),
            Op::Error(text) => push(&mut app, ServerEvent::Error(text)),
            Op::Dismiss => drop(app.dismiss_alert()),
        }

        if app.is_admin() {
            assert!(!matches!(app.overlay(), Some(Overlay::JoinPrompt { .. })), "admin prompted to join");
        }
        assert!(app.rooms().is_empty() || app.room_cursor() < app.rooms().len(), "cursor out of range");
        for message in app.messages() {
            if let Some(room_id) = &message.room_id {
                assert_eq!(Some(room_id), app.selected_room(), "message from another room");
            }
        }
    }
});
