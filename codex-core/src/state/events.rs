//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup events
    /// Firmware home and post-home move finished
    HomeComplete,
    /// Fixed settle wait after a setup move elapsed
    Settled,
    /// Head reached the manual attachment position
    AttachPositionReached,
    /// Operator confirmed the tool head is attached
    AttachConfirmed,

    // Cycle events
    /// One sort cycle finished and more remain
    CycleComplete,
    /// Last sort cycle finished
    RunComplete,
}
