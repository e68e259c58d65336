//! Reset line abstraction
//!
//! Panel tables describe reset pulses in logical terms (asserted / released).
//! The board decides which electrical level that is; [`ResetPin`] applies the
//! polarity on top of any `embedded_hal` output pin.

use embedded_hal::digital::OutputPin;

/// Electrical pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Logical reset level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetLevel {
    /// Controller held in reset. This is the safe level while unpowered.
    Asserted,
    /// Controller running.
    Released,
}

/// Which electrical level asserts reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Reset is asserted by driving the pin low (the common RESX wiring).
    #[default]
    ActiveLow,
    /// Reset is asserted by driving the pin high.
    ActiveHigh,
}

impl Polarity {
    /// Electrical level for a logical reset level.
    pub const fn pin_state(self, level: ResetLevel) -> PinState {
        match (self, level) {
            (Self::ActiveLow, ResetLevel::Asserted) | (Self::ActiveHigh, ResetLevel::Released) => {
                PinState::Low
            }
            (Self::ActiveLow, ResetLevel::Released) | (Self::ActiveHigh, ResetLevel::Asserted) => {
                PinState::High
            }
        }
    }
}

/// Reset control line
pub trait ResetLine {
    /// Error type
    type Error: core::fmt::Debug;

    /// Drive the line to `level`. Returns once the level is on the pin.
    fn set_level(&mut self, level: ResetLevel) -> Result<(), Self::Error>;
}

impl<T: ResetLine> ResetLine for &mut T {
    type Error = T::Error;

    fn set_level(&mut self, level: ResetLevel) -> Result<(), Self::Error> {
        T::set_level(self, level)
    }
}

/// [`ResetLine`] over a GPIO output pin
pub struct ResetPin<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: OutputPin> ResetPin<P> {
    /// Wrap `pin`; nothing is driven until the first [`ResetLine::set_level`].
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Configured polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ResetLine for ResetPin<P> {
    type Error = P::Error;

    fn set_level(&mut self, level: ResetLevel) -> Result<(), Self::Error> {
        match self.polarity.pin_state(level) {
            PinState::High => self.pin.set_high(),
            PinState::Low => self.pin.set_low(),
        }
    }
}
