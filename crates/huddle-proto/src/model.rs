//! Records owned by the chat server.
//!
//! The client treats these as immutable snapshots: it receives them from the
//! directory API or socket events and never edits them in place. Field names
//! follow the server's camelCase JSON; optional flags default to `false`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MessageId, RoomId, UserId};

/// A logged-in user as returned by `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Global administrator.
    #[serde(default)]
    pub is_admin: bool,
}

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Server-assigned identifier.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Owning user. `None` for rooms without an owner.
    #[serde(default)]
    pub admin_id: Option<UserId>,
    /// Owning user record, when the server embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<User>,
}

impl Room {
    /// Whether `user` owns this room.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.admin_id.as_ref() == Some(user)
    }
}

/// A chat message.
///
/// Ordered by arrival. `created_at` is informational and never used for
/// sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Author. `None` for system messages.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Lifecycle notice rather than user content.
    #[serde(default)]
    pub is_system: bool,
    /// Sent with admin attribution.
    #[serde(default)]
    pub is_admin: bool,
    /// Author record, when the server embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Room the message was posted to, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// Server creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a local system notice. Never sent to the server.
    pub fn system(id: MessageId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            user_id: None,
            is_system: true,
            is_admin: false,
            user: None,
            room_id: None,
            created_at,
        }
    }

    /// Author display name, if the server embedded the author.
    pub fn author_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_defaults_missing_flags() {
        let json = r#"{
            "id": "m1",
            "text": "hi",
            "userId": "u1",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;

        let message: Message = serde_json::from_str(json).expect("decode message");
        assert!(!message.is_system);
        assert!(!message.is_admin);
        assert!(message.user.is_none());
        assert_eq!(message.user_id, Some(UserId::new("u1")));
    }

    #[test]
    fn room_with_null_admin() {
        let json = r#"{"id": "r1", "name": "general", "adminId": null}"#;
        let room: Room = serde_json::from_str(json).expect("decode room");

        assert!(room.admin_id.is_none());
        assert!(!room.is_owned_by(&UserId::new("u1")));
    }

    #[test]
    fn room_ownership() {
        let json = r#"{
            "id": "r1",
            "name": "general",
            "adminId": "u1",
            "admin": {"id": "u1", "name": "alice", "isAdmin": false}
        }"#;
        let room: Room = serde_json::from_str(json).expect("decode room");

        assert!(room.is_owned_by(&UserId::new("u1")));
        assert_eq!(room.admin.map(|a| a.name), Some("alice".to_string()));
    }

    #[test]
    fn system_message_has_no_author() {
        let message = Message::system(MessageId::new("system-join-1"), "bob has joined the room", Utc::now());

        assert!(message.is_system);
        assert!(message.user_id.is_none());
        assert!(message.author_name().is_none());
    }
}
