//! Fuzz target for inbound frame decoding
//!
//! Feeds arbitrary text through the same path the connection task uses:
//! Engine.IO frame, then Socket.IO packet, then typed server event.
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use huddle_proto::{EnginePacket, PacketKind, ServerEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|frame: &str| {
    let Ok(EnginePacket::Message(packet)) = EnginePacket::decode(frame) else {
        return;
    };

    // Whatever decodes must encode again.
    let _ = packet.encode();

    if let PacketKind::Event { name, data, .. } = packet.kind {
        let _ = ServerEvent::decode(&name, data);
    }
});
