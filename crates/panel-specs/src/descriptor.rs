//! Panel descriptor
//!
//! Everything that distinguishes one panel variant from another: link
//! parameters, modes, supply names, the reset pulse train, vendor command
//! tables and timing constants. Descriptors are `const` data and are chosen
//! by device identity at startup.

use core::time::Duration;

use panel_hal::{BacklightType, ModeFlags, PixelFormat, ResetLevel};

use crate::command::{CommandSequence, SequenceError};
use crate::mode::DisplayMode;
use crate::reset::ResetSequence;

/// Display controller IC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Controller {
    /// Chipone ICNA3512
    ChiponeIcna3512,
    /// Any controller that only needs standard DCS
    GenericDcs,
}

/// Settle times around power and sleep transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerTimings {
    /// After the last rail is on, before the reset train.
    pub power_on_settle: Duration,
    /// After "exit sleep", before any further command.
    pub sleep_out: Duration,
    /// After "enter sleep", before rails go down.
    pub sleep_in: Duration,
}

/// DCS brightness mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacklightConfig {
    /// Highest accepted level.
    pub max_brightness: u16,
    /// Level applied on the first enable.
    pub default_brightness: u16,
    /// Applied to the raw brightness read back from the controller.
    pub read_mask: u16,
    /// Value mapping reported to the backlight layer.
    pub kind: BacklightType,
}

impl BacklightConfig {
    /// 8-bit raw brightness, full on by default.
    pub const RAW_8BIT: Self = Self {
        max_brightness: 255,
        default_brightness: 255,
        read_mask: 0x00FF,
        kind: BacklightType::Raw,
    };
}

/// Complete description of one panel variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PanelDescriptor {
    /// Human-readable name.
    pub name: &'static str,
    /// Device identity used to pick this descriptor.
    pub compatible: &'static str,
    /// Controller IC.
    pub controller: Controller,
    /// Data lanes.
    pub lanes: u8,
    /// Pixel format on the link.
    pub format: PixelFormat,
    /// Peripheral mode flags applied at attach time.
    pub mode_flags: ModeFlags,
    /// Virtual channel the controller listens on.
    pub channel: u8,
    /// Supported modes; the first is preferred.
    pub modes: &'static [DisplayMode],
    /// Active area width in millimetres.
    pub width_mm: u16,
    /// Active area height in millimetres.
    pub height_mm: u16,
    /// Supply rail names in power-up order.
    pub supplies: &'static [&'static str],
    /// Reset pulse train run after power-up.
    pub reset: ResetSequence,
    /// Sent after reset, before "exit sleep".
    pub init: CommandSequence,
    /// Sent after "exit sleep" and its settle time.
    pub post_sleep_out: CommandSequence,
    /// Settle times.
    pub timings: PowerTimings,
    /// Brightness mapping.
    pub backlight: BacklightConfig,
}

impl PanelDescriptor {
    /// Preferred mode.
    pub fn preferred_mode(&self) -> Option<&'static DisplayMode> {
        self.modes.first()
    }

    /// Physical size `(width, height)` in millimetres.
    pub const fn physical_size_mm(&self) -> (u16, u16) {
        (self.width_mm, self.height_mm)
    }

    /// Check the descriptor before it is used to drive hardware.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if !(1..=4).contains(&self.lanes) {
            return Err(DescriptorError::InvalidLanes(self.lanes));
        }
        if self.channel > 3 {
            return Err(DescriptorError::InvalidChannel(self.channel));
        }
        if self.modes.is_empty() {
            return Err(DescriptorError::NoModes);
        }
        if let Some(index) = self.modes.iter().position(|m| !m.is_valid()) {
            return Err(DescriptorError::InvalidMode { index });
        }
        if self.supplies.is_empty() {
            return Err(DescriptorError::NoSupplies);
        }
        match self.reset.final_level() {
            None => return Err(DescriptorError::EmptyReset),
            Some(ResetLevel::Asserted) => return Err(DescriptorError::ResetLeftAsserted),
            Some(ResetLevel::Released) => {}
        }
        for seq in [&self.init, &self.post_sleep_out] {
            seq.validate().map_err(|error| DescriptorError::Sequence {
                sequence: seq.name(),
                error,
            })?;
        }
        let bl = &self.backlight;
        if bl.max_brightness == 0 || bl.default_brightness > bl.max_brightness {
            return Err(DescriptorError::InvalidBacklight);
        }
        Ok(())
    }
}

/// Descriptor rejected by [`PanelDescriptor::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorError {
    /// Lane count outside 1..=4.
    InvalidLanes(u8),
    /// Virtual channel outside 0..=3.
    InvalidChannel(u8),
    /// No display modes.
    NoModes,
    /// Mode with non-monotonic timings.
    InvalidMode {
        /// Position in `modes`.
        index: usize,
    },
    /// No supply rails.
    NoSupplies,
    /// Reset sequence has no steps.
    EmptyReset,
    /// Reset sequence leaves the controller in reset.
    ResetLeftAsserted,
    /// Command table entry disagrees with its encoding.
    Sequence {
        /// Table name.
        sequence: &'static str,
        /// Offending entry.
        error: SequenceError,
    },
    /// Zero maximum or default above maximum.
    InvalidBacklight,
}

impl core::fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLanes(n) => write!(f, "invalid DSI lane count {n}"),
            Self::InvalidChannel(ch) => write!(f, "invalid virtual channel {ch}"),
            Self::NoModes => write!(f, "no display modes"),
            Self::InvalidMode { index } => write!(f, "display mode {index} has invalid timings"),
            Self::NoSupplies => write!(f, "no supply rails"),
            Self::EmptyReset => write!(f, "empty reset sequence"),
            Self::ResetLeftAsserted => write!(f, "reset sequence ends with reset asserted"),
            Self::Sequence { sequence, error } => write!(f, "{sequence} sequence: {error}"),
            Self::InvalidBacklight => write!(f, "invalid backlight range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DescriptorError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandEntry, EntryError};
    use crate::panels::ICNA3512_DXQ7D0023;
    use crate::reset::ResetStep;

    #[test]
    fn shipped_descriptor_is_valid() {
        assert_eq!(ICNA3512_DXQ7D0023.validate(), Ok(()));
    }

    #[test]
    fn rejects_five_lanes() {
        let d = PanelDescriptor {
            lanes: 5,
            ..ICNA3512_DXQ7D0023
        };
        assert_eq!(d.validate(), Err(DescriptorError::InvalidLanes(5)));
    }

    #[test]
    fn rejects_reset_left_asserted() {
        static STUCK: [ResetStep; 1] = [ResetStep::assert_ms(10)];
        let d = PanelDescriptor {
            reset: ResetSequence::new(&STUCK),
            ..ICNA3512_DXQ7D0023
        };
        assert_eq!(d.validate(), Err(DescriptorError::ResetLeftAsserted));
    }

    #[test]
    fn names_the_offending_sequence() {
        static BAD: [CommandEntry; 1] = [CommandEntry::short(0x9F, &[])];
        let d = PanelDescriptor {
            post_sleep_out: CommandSequence::new("post-sleep-out", &BAD),
            ..ICNA3512_DXQ7D0023
        };
        assert_eq!(
            d.validate(),
            Err(DescriptorError::Sequence {
                sequence: "post-sleep-out",
                error: SequenceError {
                    index: 0,
                    kind: EntryError::ShortPayloadLength { len: 0 },
                },
            })
        );
    }

    #[test]
    fn rejects_default_above_max() {
        let d = PanelDescriptor {
            backlight: BacklightConfig {
                default_brightness: 300,
                ..BacklightConfig::RAW_8BIT
            },
            ..ICNA3512_DXQ7D0023
        };
        assert_eq!(d.validate(), Err(DescriptorError::InvalidBacklight));
    }
}
