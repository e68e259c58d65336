//! Backlight abstraction
//!
//! Only the get/set contract is modelled; registration with a backlight
//! subsystem is left to the integration layer.

/// Brightness level in `0..=max_brightness`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Brightness(u16);

impl Brightness {
    /// Backlight off.
    pub const OFF: Self = Self(0);

    /// Wrap a raw level. Range checking happens against a device maximum,
    /// see [`Brightness::clamp_to`].
    pub const fn new(level: u16) -> Self {
        Self(level)
    }

    /// Raw level.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Limit to `max`.
    #[must_use]
    pub fn clamp_to(self, max: u16) -> Self {
        Self(self.0.min(max))
    }

    /// True for [`Brightness::OFF`].
    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(u16::from(value))
    }
}

/// How brightness values map to the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BacklightType {
    /// Value written straight to a hardware register.
    #[default]
    Raw,
    /// Platform-specific interface.
    Platform,
    /// Firmware-controlled interface.
    Firmware,
}

/// Brightness control
pub trait Backlight {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read the current level from the device.
    async fn brightness(&mut self) -> Result<Brightness, Self::Error>;

    /// Apply `level`. Values above [`Backlight::max_brightness`] are clamped.
    async fn set_brightness(&mut self, level: Brightness) -> Result<(), Self::Error>;

    /// Highest accepted level.
    fn max_brightness(&self) -> u16;

    /// Value mapping.
    fn kind(&self) -> BacklightType {
        BacklightType::Raw
    }
}
