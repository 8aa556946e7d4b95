//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// A join prompt only opens for a non-admin on a room not yet joined.
///
/// Checked on the transition that opens the prompt: the room may become
/// joined later while the prompt is still visible (an acknowledgment racing a
/// second selection), which is fine.
pub struct PromptOnlyForUnjoined;

impl Invariant for PromptOnlyForUnjoined {
    fn name(&self) -> &'static str {
        "PromptOnlyForUnjoined"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let current = &state.current;
        let Some(room) = &current.prompt_room else {
            return Ok(());
        };

        if current.is_admin {
            return Err(Violation {
                invariant: self.name(),
                message: format!("admin shown join prompt for {room}"),
            });
        }

        let Some(previous) = &state.previous else {
            return Ok(());
        };
        let newly_opened = previous.prompt_room.as_ref() != Some(room);
        if newly_opened && previous.joined_rooms.contains(room) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("join prompt opened for already joined room {room}"),
            });
        }
        Ok(())
    }
}

/// No messages are listed while no room is selected.
pub struct NoMessagesWithoutRoom;

impl Invariant for NoMessagesWithoutRoom {
    fn name(&self) -> &'static str {
        "NoMessagesWithoutRoom"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let current = &state.current;
        if current.selected_room.is_none() && current.message_count() > 0 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} messages listed with no room selected", current.message_count()),
            });
        }
        Ok(())
    }
}

/// Messages that carry a room id belong to the selected room.
pub struct MessagesMatchSelection;

impl Invariant for MessagesMatchSelection {
    fn name(&self) -> &'static str {
        "MessagesMatchSelection"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let current = &state.current;
        let stray = current
            .message_rooms
            .iter()
            .flatten()
            .find(|room| current.selected_room.as_ref() != Some(*room));

        match stray {
            Some(room) => Err(Violation {
                invariant: self.name(),
                message: format!("message for {room} listed while {:?} is selected", current.selected_room),
            }),
            None => Ok(()),
        }
    }
}

/// At most one synthetic join notice is listed.
pub struct SingleJoinNotice;

impl Invariant for SingleJoinNotice {
    fn name(&self) -> &'static str {
        "SingleJoinNotice"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let notices = state.current.join_notices;
        if notices > 1 {
            return Err(Violation { invariant: self.name(), message: format!("{notices} join notices listed") });
        }
        Ok(())
    }
}

/// Administrators always send with admin attribution.
pub struct AdminAlwaysSendsAsAdmin;

impl Invariant for AdminAlwaysSendsAsAdmin {
    fn name(&self) -> &'static str {
        "AdminAlwaysSendsAsAdmin"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let current = &state.current;
        if current.is_admin && !current.send_as_admin {
            return Err(Violation { invariant: self.name(), message: "admin send toggle is off".into() });
        }
        Ok(())
    }
}
