//! State machine definition
//!
//! Setup is gated by three operator presses; after that the run is a fixed
//! number of sort cycles. There is no error state: failures are either
//! absorbed inside a cycle or abort the whole run.

use super::events::Event;

/// Run states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Waiting for the press that homes the stage
    AwaitingHome,
    /// Stage homed and at the post-home offset
    Homed,
    /// Waiting for the press that moves the head to the front
    AwaitingAttachPosition,
    /// Head at the front, bed lowered
    PositionedForAttach,
    /// Waiting for the operator to confirm the tool head is on
    AwaitingAttachConfirm,
    /// Running the sort cycle with this zero-based index
    Sorting(u32),
    /// All cycles done
    Finished,
}

impl CycleState {
    /// Check if suction may be switched on
    pub fn suction_allowed(&self) -> bool {
        matches!(self, CycleState::Sorting(_))
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use CycleState::*;
        use Event::*;

        match (self, event) {
            // Setup
            (AwaitingHome, HomeComplete) => Homed,
            (Homed, Settled) => AwaitingAttachPosition,
            (AwaitingAttachPosition, AttachPositionReached) => PositionedForAttach,
            (PositionedForAttach, Settled) => AwaitingAttachConfirm,
            (AwaitingAttachConfirm, AttachConfirmed) => Sorting(0),

            // Sort cycles
            (Sorting(i), CycleComplete) => Sorting(i.saturating_add(1)),
            (Sorting(_), RunComplete) => Finished,

            // Default: stay in current state
            _ => self,
        }
    }
}
