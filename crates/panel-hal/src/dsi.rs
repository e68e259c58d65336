//! MIPI-DSI command channel abstraction
//!
//! Models the low-power command side of a DSI link: packet data types, the
//! peripheral mode flags a panel driver may toggle, and the [`DsiHost`] trait
//! a host controller implements.

/// Largest packet payload (opcode included) the drivers in this workspace
/// will ever build. Panel tables are validated against it.
pub const MAX_PACKET_LEN: usize = 64;

/// DSI processor-to-peripheral data types used for command traffic.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// Generic short write, no parameters.
    GenericShortWrite0 = 0x03,
    /// Generic short write, one parameter.
    GenericShortWrite1 = 0x13,
    /// Generic short write, two parameters.
    GenericShortWrite2 = 0x23,
    /// DCS short write, opcode only.
    DcsShortWrite = 0x05,
    /// DCS short write, opcode plus one parameter.
    DcsShortWriteParam = 0x15,
    /// DCS read request.
    DcsRead = 0x06,
    /// Set maximum return packet size.
    SetMaximumReturnPacketSize = 0x37,
    /// Generic long write.
    GenericLongWrite = 0x29,
    /// DCS long write (opcode followed by any number of parameters).
    DcsLongWrite = 0x39,
}

impl DataType {
    /// Long packets carry a 16-bit word count followed by a payload.
    pub const fn is_long(self) -> bool {
        matches!(self, Self::GenericLongWrite | Self::DcsLongWrite)
    }
}

/// One command packet as handed to the host controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    /// Virtual channel (0-3).
    pub channel: u8,
    /// Packet data type.
    pub data_type: DataType,
    /// Packet data: for DCS packets the opcode followed by its parameters.
    pub data: &'a [u8],
}

impl<'a> Packet<'a> {
    /// DCS short write: `data` is the opcode and at most one parameter.
    pub fn dcs_short(channel: u8, data: &'a [u8]) -> Self {
        let data_type = if data.len() > 1 {
            DataType::DcsShortWriteParam
        } else {
            DataType::DcsShortWrite
        };
        Self {
            channel,
            data_type,
            data,
        }
    }

    /// DCS long write: opcode plus a length-prefixed parameter block.
    pub fn dcs_long(channel: u8, data: &'a [u8]) -> Self {
        Self {
            channel,
            data_type: DataType::DcsLongWrite,
            data,
        }
    }

    /// Picks the smallest DCS encoding that fits `data`.
    pub fn dcs(channel: u8, data: &'a [u8]) -> Self {
        if data.len() > 2 {
            Self::dcs_long(channel, data)
        } else {
            Self::dcs_short(channel, data)
        }
    }

    /// DCS read request for `opcode`.
    pub fn dcs_read(channel: u8, opcode: &'a [u8; 1]) -> Self {
        Self {
            channel,
            data_type: DataType::DcsRead,
            data: opcode,
        }
    }

    /// DCS opcode carried by this packet, if any.
    pub fn opcode(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Word count field of a long packet; zero for short packets.
    pub fn word_count(&self) -> u16 {
        if self.data_type.is_long() {
            u16::try_from(self.data.len()).unwrap_or(u16::MAX)
        } else {
            0
        }
    }

    /// Packet header bytes: data identifier, two data/word-count bytes, ECC.
    ///
    /// The ECC byte is left at zero; host controllers compute it in hardware.
    pub fn header(&self) -> [u8; 4] {
        let di = ((self.channel & 0x03) << 6) | (self.data_type as u8 & 0x3F);
        if self.data_type.is_long() {
            let [lo, hi] = self.word_count().to_le_bytes();
            [di, lo, hi, 0]
        } else {
            let d0 = self.data.first().copied().unwrap_or(0);
            let d1 = self.data.get(1).copied().unwrap_or(0);
            [di, d0, d1, 0]
        }
    }

    /// Payload following the header (empty for short packets).
    pub fn payload(&self) -> &'a [u8] {
        if self.data_type.is_long() {
            self.data
        } else {
            &[]
        }
    }
}

/// DSI peripheral mode flags.
///
/// Bit positions follow the Linux `MIPI_DSI_MODE_*` flags so tables can be
/// cross-checked against vendor drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeFlags(u32);

impl ModeFlags {
    /// Video mode (as opposed to command mode).
    pub const VIDEO: Self = Self(1 << 0);
    /// Video burst mode.
    pub const VIDEO_BURST: Self = Self(1 << 1);
    /// Video sync pulses.
    pub const VIDEO_SYNC_PULSE: Self = Self(1 << 2);
    /// Send horizontal sync end packets.
    pub const VIDEO_HSE: Self = Self(1 << 4);
    /// Clock lane may stop between transmissions.
    pub const CLOCK_NON_CONTINUOUS: Self = Self(1 << 10);
    /// Send commands in low-power mode.
    pub const LPM: Self = Self(1 << 11);

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Both flag sets combined.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `self` without any of `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// True if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set or clear `other`.
    pub fn set(&mut self, other: Self, value: bool) {
        *self = if value {
            self.union(other)
        } else {
            self.difference(other)
        };
    }
}

impl core::ops::BitOr for ModeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Pixel stream formats for video mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// 24 bpp
    Rgb888,
    /// 18 bpp, loosely packed
    Rgb666,
    /// 18 bpp, tightly packed
    Rgb666Packed,
    /// 16 bpp
    Rgb565,
}

impl PixelFormat {
    /// Bits per pixel on the link.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgb888 | Self::Rgb666 => 24,
            Self::Rgb666Packed => 18,
            Self::Rgb565 => 16,
        }
    }
}

/// Command channel to a DSI peripheral.
///
/// Implementations serialize access to the link themselves; a single
/// [`write`](DsiHost::write) is one packet on the wire.
pub trait DsiHost {
    /// Transport error
    type Error: core::fmt::Debug;

    /// Send one packet and wait for the host to accept it.
    async fn write(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error>;

    /// Send a read request and copy the response into `buf`.
    ///
    /// Returns the number of bytes received.
    async fn read(&mut self, packet: &Packet<'_>, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Current peripheral mode flags.
    fn mode_flags(&self) -> ModeFlags;

    /// Replace the peripheral mode flags. Takes effect for the next packet.
    fn set_mode_flags(&mut self, flags: ModeFlags);
}

impl<T: DsiHost> DsiHost for &mut T {
    type Error = T::Error;

    async fn write(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error> {
        T::write(self, packet).await
    }

    async fn read(&mut self, packet: &Packet<'_>, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read(self, packet, buf).await
    }

    fn mode_flags(&self) -> ModeFlags {
        T::mode_flags(self)
    }

    fn set_mode_flags(&mut self, flags: ModeFlags) {
        T::set_mode_flags(self, flags);
    }
}
