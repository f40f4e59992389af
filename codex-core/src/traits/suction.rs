//! Suction actuator trait

/// Vacuum fan on the tool head
///
/// Both calls may block for the fan to spool up or down. Switching off an
/// idle fan is harmless, which is what error cleanup relies on.
pub trait SuctionActuator {
    /// Start suction and wait for full speed
    fn on(&mut self);

    /// Stop suction and wait for the card to let go
    fn off(&mut self);

    /// Check if suction is currently commanded on
    fn is_on(&self) -> bool;
}
