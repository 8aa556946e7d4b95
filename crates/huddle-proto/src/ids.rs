//! Opaque server-assigned identifiers.
//!
//! The server hands out string ids; the client never inspects them beyond
//! equality. Separate newtypes keep a room id from being passed where a user id
//! is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

opaque_id!(
    /// Server-assigned user identifier.
    UserId
);

opaque_id!(
    /// Server-assigned room identifier.
    RoomId
);

opaque_id!(
    /// Message identifier. Server-assigned, or `system-join-*` for local notices.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = RoomId::new("r-1");
        assert_eq!(serde_json::to_string(&id).expect("encode"), "\"r-1\"");

        let back: RoomId = serde_json::from_str("\"r-1\"").expect("decode");
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(UserId::from("u-42").to_string(), "u-42");
    }
}
