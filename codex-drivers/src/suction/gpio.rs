//! GPIO suction fan
//!
//! Drives the vacuum fan through a single output (MOSFET or motor driver
//! enable). Switching waits for the fan to spool up or down, so a card is
//! held before the head moves and released before the next command.

use codex_core::config::PinConfig;
use codex_core::traits::SuctionActuator;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Suction fan on an output pin
pub struct GpioSuction<P, D> {
    pin: P,
    delay: D,
    /// Pin assignment; inverted means fan ON = pin LOW
    config: PinConfig,
    /// Spool up and spool down time
    spin_ms: u32,
    /// Current logical state (true = suction on)
    on: bool,
    /// Failed pin writes so far
    write_errors: u32,
}

impl<P: OutputPin, D: DelayNs> GpioSuction<P, D> {
    /// Create a new suction fan output
    ///
    /// The pin is driven to the off level immediately, without waiting.
    pub fn new(pin: P, delay: D, config: PinConfig, spin_ms: u32) -> Self {
        let mut suction = Self {
            pin,
            delay,
            config,
            spin_ms,
            on: false,
            write_errors: 0,
        };
        suction.drive(false);
        suction
    }

    /// Number of pin writes that failed
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    fn drive(&mut self, on: bool) {
        self.on = on;

        let result = if self.config.level_for(on) {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        if result.is_err() {
            self.write_errors = self.write_errors.saturating_add(1);
        }
    }
}

impl<P: OutputPin, D: DelayNs> SuctionActuator for GpioSuction<P, D> {
    fn on(&mut self) {
        self.drive(true);
        self.delay.delay_ms(self.spin_ms);
    }

    fn off(&mut self) {
        self.drive(false);
        self.delay.delay_ms(self.spin_ms);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
    }

    /// Delay that only adds up requested time
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn active_high(spin_ms: u32) -> GpioSuction<MockPin, MockDelay> {
        GpioSuction::new(MockPin::new(), MockDelay::default(), PinConfig::new(23), spin_ms)
    }

    #[test]
    fn test_active_high_suction() {
        let mut fan = active_high(1000);

        // Initially off
        assert!(!fan.is_on());
        assert!(!fan.pin.high);

        fan.on();
        assert!(fan.is_on());
        assert!(fan.pin.high);

        fan.off();
        assert!(!fan.is_on());
        assert!(!fan.pin.high);
    }

    #[test]
    fn test_active_low_suction() {
        let config = PinConfig::inverted(23);
        let mut fan = GpioSuction::new(MockPin::new(), MockDelay::default(), config, 0);

        // Initially off (pin is high for active-low)
        assert!(!fan.is_on());
        assert!(fan.pin.high);

        fan.on();
        assert!(!fan.pin.high);
    }

    #[test]
    fn test_switching_waits_for_spin() {
        let mut fan = active_high(1000);
        assert_eq!(fan.delay.total_ns, 0);

        fan.on();
        assert_eq!(fan.delay.total_ns, 1_000_000_000);

        fan.off();
        assert_eq!(fan.delay.total_ns, 2_000_000_000);
    }

    #[test]
    fn test_off_is_idempotent() {
        let mut fan = active_high(0);
        fan.off();
        fan.off();
        assert!(!fan.is_on());
        assert!(!fan.pin.high);
        assert_eq!(fan.write_errors(), 0);
    }
}
