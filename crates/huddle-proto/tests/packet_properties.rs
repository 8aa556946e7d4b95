//! Property-based tests for Engine.IO / Socket.IO framing.
//!
//! Decoding runs on untrusted server input, so it must never panic regardless
//! of what arrives. Events we encode must decode back to the same name and
//! payload.

use huddle_proto::{ClientEvent, CreateRoom, EnginePacket, PacketKind, RoomId, SendMessage, SocketPacket, UserId};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for frames that look roughly like Engine.IO traffic.
fn frame_like() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[0-6][0-6]?(/[a-z]{0,6},)?[0-9]{0,25}.{0,40}",
        "4[0-4]\\[\"[a-zA-Z]{1,12}\",.{0,30}\\]",
    ]
}

#[test]
fn prop_decode_never_panics() {
    proptest!(|(frame in frame_like())| {
        let _ = EnginePacket::decode(&frame);
    });
}

#[test]
fn prop_send_message_survives_framing() {
    proptest!(|(text in ".{0,200}", is_admin in any::<bool>(), room in "[a-z0-9-]{1,16}")| {
        let event = ClientEvent::SendMessage(SendMessage {
            room_id: RoomId::new(room.clone()),
            user_id: UserId::new("u1"),
            text: text.clone(),
            is_admin,
        });

        let packet = event.to_packet().expect("encode packet");
        let frame = EnginePacket::Message(packet).encode().expect("encode frame");
        let decoded = EnginePacket::decode(&frame).expect("decode frame");

        let EnginePacket::Message(SocketPacket { namespace, kind: PacketKind::Event { name, data, id } }) = decoded else {
            panic!("expected event frame, got {decoded:?}");
        };
        prop_assert_eq!(namespace, "/");
        prop_assert_eq!(id, None);
        prop_assert_eq!(name, "sendMessage");
        prop_assert_eq!(data, json!({"roomId": room, "userId": "u1", "text": text, "isAdmin": is_admin}));
    });
}

#[test]
fn create_room_frame_is_byte_exact() {
    let event = ClientEvent::CreateRoom(CreateRoom { name: "general".into(), admin_id: Some(UserId::new("u1")) });
    let frame = EnginePacket::Message(event.to_packet().expect("encode")).encode().expect("frame");

    assert_eq!(frame, r#"42["createRoom",{"adminId":"u1","name":"general"}]"#);
}

#[test]
fn oversized_ack_id_is_malformed_not_panic() {
    let frame = format!("43{}[]", "9".repeat(40));
    assert!(EnginePacket::decode(&frame).is_err());
}
