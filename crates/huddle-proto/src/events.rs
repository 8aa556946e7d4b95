//! Typed socket events.
//!
//! The server speaks a fixed set of named events. [`ClientEvent`] covers what
//! the client emits and [`ServerEvent`] what it subscribes to. Event names are
//! part of the server contract and must not change.
//!
//! ```text
//! joinRoom     ──> roomJoined { room, messages }
//! sendMessage  ──> newMessage (broadcast)
//! createRoom   ──> roomCreated (others) / roomCreationSuccess (creator)
//!                  error (any time)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Message, Room, RoomId, SocketPacket, UserId, errors::Result};

/// `joinRoom` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    /// Room to enter.
    pub room_id: RoomId,
    /// Joining user.
    pub user_id: UserId,
    /// Joining user's display name.
    pub username: String,
}

/// `sendMessage` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    /// Target room.
    pub room_id: RoomId,
    /// Author.
    pub user_id: UserId,
    /// Message body.
    pub text: String,
    /// Request admin attribution.
    pub is_admin: bool,
}

/// `createRoom` payload.
///
/// `admin_id` is serialized as `null` when absent; the server expects the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    /// Room name.
    pub name: String,
    /// Owner of the new room.
    pub admin_id: Option<UserId>,
}

/// `roomJoined` payload: the join acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomJoined {
    /// Joined room.
    pub room: Room,
    /// Authoritative history, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// `POST /users` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Requested display name.
    pub name: String,
    /// Request admin privileges.
    pub is_admin: bool,
    /// Admin password. Only sent for admin logins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

/// Events emitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Enter a room and request its history.
    JoinRoom(JoinRoom),
    /// Post a message.
    SendMessage(SendMessage),
    /// Create a room.
    CreateRoom(CreateRoom),
}

impl ClientEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "joinRoom",
            Self::SendMessage(_) => "sendMessage",
            Self::CreateRoom(_) => "createRoom",
        }
    }

    /// Encode as a Socket.IO event packet on the default namespace.
    pub fn to_packet(&self) -> Result<SocketPacket> {
        let data = match self {
            Self::JoinRoom(payload) => serde_json::to_value(payload)?,
            Self::SendMessage(payload) => serde_json::to_value(payload)?,
            Self::CreateRoom(payload) => serde_json::to_value(payload)?,
        };
        Ok(SocketPacket::event(self.name(), data))
    }
}

/// Events pushed by the server that the client handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Join acknowledgment with authoritative history.
    RoomJoined(RoomJoined),
    /// Message broadcast.
    NewMessage(Message),
    /// Someone else created a room.
    RoomCreated(Room),
    /// Our own room creation succeeded.
    RoomCreationSuccess(Room),
    /// Generic protocol error.
    Error(String),
}

impl ServerEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomJoined(_) => "roomJoined",
            Self::NewMessage(_) => "newMessage",
            Self::RoomCreated(_) => "roomCreated",
            Self::RoomCreationSuccess(_) => "roomCreationSuccess",
            Self::Error(_) => "error",
        }
    }

    /// Decode a named event.
    ///
    /// Returns `Ok(None)` for events the client does not subscribe to, and an
    /// error when a known event carries an undecodable payload.
    pub fn decode(name: &str, data: Value) -> Result<Option<Self>> {
        let event = match name {
            "roomJoined" => Self::RoomJoined(serde_json::from_value(data)?),
            "newMessage" => Self::NewMessage(serde_json::from_value(data)?),
            "roomCreated" => Self::RoomCreated(serde_json::from_value(data)?),
            "roomCreationSuccess" => Self::RoomCreationSuccess(serde_json::from_value(data)?),
            "error" => Self::Error(error_text(data)),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Servers send either a bare string or `{ "message": ... }`.
fn error_text(data: Value) -> String {
    match data {
        Value::String(text) => text,
        Value::Object(ref map) => match map.get("message") {
            Some(Value::String(text)) => text.clone(),
            _ => data.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PacketKind;

    #[test]
    fn join_room_uses_camel_case_keys() {
        let event = ClientEvent::JoinRoom(JoinRoom {
            room_id: RoomId::new("r1"),
            user_id: UserId::new("u1"),
            username: "alice".into(),
        });

        let packet = event.to_packet().expect("encode");
        match packet.kind {
            PacketKind::Event { name, data, .. } => {
                assert_eq!(name, "joinRoom");
                assert_eq!(data, json!({"roomId": "r1", "userId": "u1", "username": "alice"}));
            },
            other => panic!("expected event packet, got {other:?}"),
        }
    }

    #[test]
    fn create_room_keeps_null_admin() {
        let payload = CreateRoom { name: "general".into(), admin_id: None };
        let value = serde_json::to_value(&payload).expect("encode");
        assert_eq!(value, json!({"name": "general", "adminId": null}));
    }

    #[test]
    fn login_request_omits_password_for_regular_users() {
        let request = LoginRequest { name: "bob".into(), is_admin: false, admin_password: None };
        let value = serde_json::to_value(&request).expect("encode");
        assert_eq!(value, json!({"name": "bob", "isAdmin": false}));
    }

    #[test]
    fn decode_room_joined() {
        let data = json!({
            "room": {"id": "r1", "name": "general", "adminId": null},
            "messages": [
                {"id": "m1", "text": "hello", "userId": "u2", "createdAt": "2024-05-01T10:00:00Z"}
            ]
        });

        let event = ServerEvent::decode("roomJoined", data).expect("decode").expect("known event");
        match event {
            ServerEvent::RoomJoined(joined) => {
                assert_eq!(joined.room.name, "general");
                assert_eq!(joined.messages.len(), 1);
            },
            other => panic!("expected RoomJoined, got {other:?}"),
        }
    }

    #[test]
    fn decode_error_accepts_string_and_object() {
        let plain = ServerEvent::decode("error", json!("room full")).expect("decode");
        assert_eq!(plain, Some(ServerEvent::Error("room full".into())));

        let object = ServerEvent::decode("error", json!({"message": "nope"})).expect("decode");
        assert_eq!(object, Some(ServerEvent::Error("nope".into())));
    }

    #[test]
    fn unknown_events_are_ignored() {
        let decoded = ServerEvent::decode("userTyping", json!({})).expect("decode");
        assert!(decoded.is_none());
    }

    #[test]
    fn malformed_known_event_is_an_error() {
        assert!(ServerEvent::decode("newMessage", json!({"text": 3})).is_err());
    }
}
