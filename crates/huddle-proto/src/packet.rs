//! Engine.IO v4 / Socket.IO v4 text framing.
//!
//! Every WebSocket text frame is one Engine.IO packet: a single type digit
//! followed by an optional payload. Engine.IO `message` packets carry one
//! Socket.IO packet, which has its own type digit, an optional namespace, an
//! optional ack id and a JSON body.
//!
//! ```text
//! 0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}
//! 2                                   ping (server -> client)
//! 3                                   pong (client -> server)
//! 40                                  socket.io connect, default namespace
//! 40{"sid":"xyz"}                     connect acknowledgment
//! 42["newMessage",{...}]              event
//! 42/admin,7["joinRoom",{...}]        event with namespace and ack id
//! 44{"message":"not authorized"}      connect error
//! ```
//!
//! Binary attachments (Socket.IO types 5 and 6) are rejected; the chat server
//! never sends them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// Default Socket.IO namespace.
pub const DEFAULT_NAMESPACE: &str = "/";

/// Engine.IO `open` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Engine.IO session id.
    pub sid: String,
    /// Transports the server offers to upgrade to.
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Server ping cadence in milliseconds.
    pub ping_interval: u64,
    /// Grace period after a ping before the server drops us, in milliseconds.
    pub ping_timeout: u64,
    /// Maximum payload size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// How long to wait for a server ping before declaring the link dead.
    pub fn heartbeat_deadline(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

/// One Engine.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    /// Session opened (type 0).
    Open(Handshake),
    /// Session closed (type 1).
    Close,
    /// Heartbeat probe (type 2).
    Ping,
    /// Heartbeat reply (type 3).
    Pong,
    /// Socket.IO payload (type 4).
    Message(SocketPacket),
    /// Transport upgrade (type 5).
    Upgrade,
    /// No-op (type 6).
    Noop,
}

impl EnginePacket {
    /// Encode as a WebSocket text frame.
    pub fn encode(&self) -> Result<String> {
        Ok(match self {
            Self::Open(handshake) => format!("0{}", serde_json::to_string(handshake)?),
            Self::Close => "1".to_owned(),
            Self::Ping => "2".to_owned(),
            Self::Pong => "3".to_owned(),
            Self::Message(packet) => format!("4{}", packet.encode()?),
            Self::Upgrade => "5".to_owned(),
            Self::Noop => "6".to_owned(),
        })
    }

    /// Decode a WebSocket text frame.
    ///
    /// Ping and pong payloads (`2probe`) are accepted and discarded.
    pub fn decode(frame: &str) -> Result<Self> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(ProtocolError::EmptyPacket)?;
        let rest = chars.as_str();

        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => Ok(Self::Message(SocketPacket::decode(rest)?)),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            found => Err(ProtocolError::UnknownPacketType { layer: "engine.io", found }),
        }
    }
}

/// Socket.IO packet body.
#[derive(Debug, Clone, PartialEq)]
pub enum PacketKind {
    /// Namespace connect (type 0). The server echoes back with a `sid`.
    Connect {
        /// Socket.IO session id, present only in server acknowledgments.
        sid: Option<String>,
    },
    /// Namespace disconnect (type 1).
    Disconnect,
    /// Named event (type 2).
    Event {
        /// Acknowledgment id requested by the sender.
        id: Option<u64>,
        /// Event name.
        name: String,
        /// First event argument, `Null` when absent.
        data: Value,
    },
    /// Acknowledgment (type 3).
    Ack {
        /// Acknowledged packet id.
        id: u64,
        /// Acknowledgment arguments.
        data: Value,
    },
    /// Namespace connect refused (type 4).
    ConnectError {
        /// Server-provided reason.
        message: String,
    },
}

/// One Socket.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    /// Namespace, `/` unless the sender specified one.
    pub namespace: String,
    /// Packet body.
    pub kind: PacketKind,
}

impl SocketPacket {
    /// Connect request for the default namespace.
    pub fn connect() -> Self {
        Self { namespace: DEFAULT_NAMESPACE.to_owned(), kind: PacketKind::Connect { sid: None } }
    }

    /// Event on the default namespace without an ack id.
    pub fn event(name: impl Into<String>, data: Value) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            kind: PacketKind::Event { id: None, name: name.into(), data },
        }
    }

    /// Encode as the body of an Engine.IO message packet.
    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        out.push(match self.kind {
            PacketKind::Connect { .. } => '0',
            PacketKind::Disconnect => '1',
            PacketKind::Event { .. } => '2',
            PacketKind::Ack { .. } => '3',
            PacketKind::ConnectError { .. } => '4',
        });

        if self.namespace != DEFAULT_NAMESPACE {
            out.push_str(&self.namespace);
            out.push(',');
        }

        match &self.kind {
            PacketKind::Connect { sid: None } | PacketKind::Disconnect => {},
            PacketKind::Connect { sid: Some(sid) } => {
                out.push_str(&serde_json::to_string(&serde_json::json!({ "sid": sid }))?);
            },
            PacketKind::Event { id, name, data } => {
                if let Some(id) = id {
                    out.push_str(&id.to_string());
                }
                let args = if data.is_null() {
                    serde_json::json!([name])
                } else {
                    serde_json::json!([name, data])
                };
                out.push_str(&serde_json::to_string(&args)?);
            },
            PacketKind::Ack { id, data } => {
                out.push_str(&id.to_string());
                let args = match data {
                    Value::Array(_) => data.clone(),
                    other => Value::Array(vec![other.clone()]),
                };
                out.push_str(&serde_json::to_string(&args)?);
            },
            PacketKind::ConnectError { message } => {
                out.push_str(&serde_json::to_string(&serde_json::json!({ "message": message }))?);
            },
        }

        Ok(out)
    }

    /// Decode the body of an Engine.IO message packet.
    pub fn decode(body: &str) -> Result<Self> {
        let mut chars = body.chars();
        let kind = chars.next().ok_or(ProtocolError::EmptyPacket)?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(ProtocolError::Unsupported("binary attachments"));
        }
        if !matches!(kind, '0'..='4') {
            return Err(ProtocolError::UnknownPacketType { layer: "socket.io", found: kind });
        }

        let namespace = if rest.starts_with('/') {
            match rest.split_once(',') {
                Some((ns, tail)) => {
                    rest = tail;
                    ns.to_owned()
                },
                None => {
                    let ns = rest.to_owned();
                    rest = "";
                    ns
                },
            }
        } else {
            DEFAULT_NAMESPACE.to_owned()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (id_text, payload) = rest.split_at(digits);
        let id = if id_text.is_empty() {
            None
        } else {
            Some(
                id_text
                    .parse::<u64>()
                    .map_err(|_| ProtocolError::Malformed(format!("ack id out of range: {id_text}")))?,
            )
        };

        let kind = match kind {
            '0' => PacketKind::Connect { sid: decode_connect(payload)? },
            '1' => PacketKind::Disconnect,
            '2' => decode_event(id, payload)?,
            '3' => {
                let id = id.ok_or_else(|| ProtocolError::Malformed("ack without id".into()))?;
                PacketKind::Ack { id, data: serde_json::from_str(payload)? }
            },
            _ => PacketKind::ConnectError { message: decode_connect_error(payload)? },
        };

        Ok(Self { namespace, kind })
    }
}

fn decode_connect(payload: &str) -> Result<Option<String>> {
    if payload.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(payload)?;
    Ok(value.get("sid").and_then(Value::as_str).map(str::to_owned))
}

fn decode_event(id: Option<u64>, payload: &str) -> Result<PacketKind> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Array(mut args) = value else {
        return Err(ProtocolError::Malformed("event payload is not an array".into()));
    };
    if args.is_empty() {
        return Err(ProtocolError::Malformed("event without name".into()));
    }

    let Value::String(name) = args.remove(0) else {
        return Err(ProtocolError::Malformed("event name is not a string".into()));
    };
    let data = if args.is_empty() { Value::Null } else { args.swap_remove(0) };

    Ok(PacketKind::Event { id, name, data })
}

fn decode_connect_error(payload: &str) -> Result<String> {
    if payload.is_empty() {
        return Ok(String::new());
    }
    let value: Value = serde_json::from_str(payload)?;
    Ok(match value {
        Value::String(message) => message,
        Value::Object(ref map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_open_handshake() {
        let frame = r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let packet = EnginePacket::decode(frame).expect("decode");

        let EnginePacket::Open(handshake) = packet else {
            panic!("expected open, got {packet:?}");
        };
        assert_eq!(handshake.sid, "abc");
        assert_eq!(handshake.heartbeat_deadline(), Duration::from_millis(45_000));
    }

    #[test]
    fn ping_with_probe_payload() {
        assert_eq!(EnginePacket::decode("2probe").expect("decode"), EnginePacket::Ping);
        assert_eq!(EnginePacket::Pong.encode().expect("encode"), "3");
    }

    #[test]
    fn connect_request_is_bare() {
        let frame = EnginePacket::Message(SocketPacket::connect()).encode().expect("encode");
        assert_eq!(frame, "40");
    }

    #[test]
    fn decode_connect_ack() {
        let packet = EnginePacket::decode(r#"40{"sid":"s-1"}"#).expect("decode");
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket {
                namespace: "/".into(),
                kind: PacketKind::Connect { sid: Some("s-1".into()) },
            })
        );
    }

    #[test]
    fn decode_event_with_namespace_and_id() {
        let packet = SocketPacket::decode(r#"2/admin,12["joinRoom",{"roomId":"r1"}]"#).expect("decode");

        assert_eq!(packet.namespace, "/admin");
        assert_eq!(
            packet.kind,
            PacketKind::Event { id: Some(12), name: "joinRoom".into(), data: json!({"roomId": "r1"}) }
        );
    }

    #[test]
    fn event_encoding_matches_wire_format() {
        let packet = SocketPacket::event("sendMessage", json!({"text": "hi"}));
        assert_eq!(packet.encode().expect("encode"), r#"2["sendMessage",{"text":"hi"}]"#);
    }

    #[test]
    fn event_without_data_decodes_to_null() {
        let packet = SocketPacket::decode(r#"2["ping"]"#).expect("decode");
        assert_eq!(packet.kind, PacketKind::Event { id: None, name: "ping".into(), data: Value::Null });
    }

    #[test]
    fn connect_error_message() {
        let packet = SocketPacket::decode(r#"4{"message":"not authorized"}"#).expect("decode");
        assert_eq!(packet.kind, PacketKind::ConnectError { message: "not authorized".into() });
    }

    #[test]
    fn binary_packets_are_unsupported() {
        assert!(matches!(SocketPacket::decode("51-[\"x\"]"), Err(ProtocolError::Unsupported(_))));
    }

    #[test]
    fn rejects_unknown_types_and_empty_frames() {
        assert!(matches!(EnginePacket::decode(""), Err(ProtocolError::EmptyPacket)));
        assert!(matches!(
            EnginePacket::decode("9"),
            Err(ProtocolError::UnknownPacketType { layer: "engine.io", found: '9' })
        ));
        assert!(matches!(SocketPacket::decode("7"), Err(ProtocolError::UnknownPacketType { .. })));
    }

    #[test]
    fn event_payload_must_be_named_array() {
        assert!(matches!(SocketPacket::decode(r#"2{"a":1}"#), Err(ProtocolError::Malformed(_))));
        assert!(matches!(SocketPacket::decode("2[]"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(SocketPacket::decode("2[1]"), Err(ProtocolError::Malformed(_))));
    }
}
