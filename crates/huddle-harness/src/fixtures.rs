//! Record builders for tests.

use chrono::{DateTime, Utc};
use huddle_proto::{Message, MessageId, Room, RoomId, User, UserId};

/// Room with an optional owner.
pub fn room(id: &str, name: &str, admin_id: Option<&str>) -> Room {
    Room { id: RoomId::from(id), name: name.into(), admin_id: admin_id.map(UserId::from), admin: None }
}

/// User record as returned by login.
pub fn user(id: &str, name: &str, is_admin: bool) -> User {
    User { id: UserId::from(id), name: name.into(), is_admin }
}

/// Chat message authored by `author`, tagged with `room_id` when given.
pub fn message(id: &str, author: &User, text: &str, room_id: Option<&str>, at: DateTime<Utc>) -> Message {
    Message {
        id: MessageId::from(id),
        text: text.into(),
        user_id: Some(author.id.clone()),
        is_system: false,
        is_admin: author.is_admin,
        user: Some(author.clone()),
        room_id: room_id.map(RoomId::from),
        created_at: at,
    }
}
