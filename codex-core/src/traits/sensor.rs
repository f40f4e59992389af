//! Contact sensor trait

/// Switch that closes when the head touches a card
///
/// The same switch doubles as the operator button during setup.
pub trait ContactSensor {
    /// Non-blocking poll of the switch
    fn is_pressed(&mut self) -> bool;
}
