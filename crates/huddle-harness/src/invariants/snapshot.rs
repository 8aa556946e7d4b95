//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the session at a point in time.
//! Invariants operate on snapshots rather than live state so checks are
//! consistent and can compare consecutive states.

use std::collections::HashSet;

use huddle_app::{App, Overlay};
use huddle_core::Environment;
use huddle_proto::RoomId;

/// Id prefix of the synthetic join notice.
pub const JOIN_NOTICE_PREFIX: &str = "system-join-";

/// Pair of consecutive session snapshots.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// State before the last transition. `None` for the first check.
    pub previous: Option<SessionSnapshot>,
    /// State after the last transition.
    pub current: SessionSnapshot,
}

impl SystemSnapshot {
    /// Create an empty snapshot (fresh session).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot without history.
    pub fn single(current: SessionSnapshot) -> Self {
        Self { previous: None, current }
    }

    /// Snapshot of a transition.
    pub fn transition(previous: SessionSnapshot, current: SessionSnapshot) -> Self {
        Self { previous: Some(previous), current }
    }
}

/// Observable state of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Logged in.
    pub authenticated: bool,
    /// Logged in as a global administrator.
    pub is_admin: bool,
    /// Selected room.
    pub selected_room: Option<RoomId>,
    /// Rooms joined this session.
    pub joined_rooms: HashSet<RoomId>,
    /// Room named by a visible join prompt.
    pub prompt_room: Option<RoomId>,
    /// Room id carried by each message, in list order.
    pub message_rooms: Vec<Option<RoomId>>,
    /// Synthetic join notices in the message list.
    pub join_notices: usize,
    /// Admin-send toggle.
    pub send_as_admin: bool,
}

impl SessionSnapshot {
    /// Capture the observable state of `app`.
    pub fn from_app<E: Environment>(app: &App<E>) -> Self {
        let prompt_room = match app.overlay() {
            Some(Overlay::JoinPrompt { room_id }) => Some(room_id.clone()),
            _ => None,
        };

        Self {
            authenticated: app.user().is_some(),
            is_admin: app.is_admin(),
            selected_room: app.selected_room().cloned(),
            joined_rooms: app.joined_rooms().clone(),
            prompt_room,
            message_rooms: app.messages().iter().map(|m| m.room_id.clone()).collect(),
            join_notices: app
                .messages()
                .iter()
                .filter(|m| m.is_system && m.id.as_str().starts_with(JOIN_NOTICE_PREFIX))
                .count(),
            send_as_admin: app.send_as_admin(),
        }
    }

    /// Number of messages in the list.
    pub fn message_count(&self) -> usize {
        self.message_rooms.len()
    }
}
