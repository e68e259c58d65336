//! Vendor command tables
//!
//! A [`CommandSequence`] is an ordered, immutable list of [`CommandEntry`]s.
//! Each entry names its wire encoding explicitly because vendor tables mix
//! short and long writes for the same opcode width.

use core::time::Duration;

use panel_hal::MAX_PACKET_LEN;

/// Wire encoding of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// Fixed-length write: opcode plus one or two parameter bytes.
    Short,
    /// Length-prefixed write: opcode plus any number of parameter bytes.
    Long,
}

/// One controller command with an optional settle time after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandEntry {
    /// Command opcode (DCS or manufacturer register).
    pub opcode: u8,
    /// Parameter bytes.
    pub payload: &'static [u8],
    /// Wire encoding.
    pub encoding: Encoding,
    /// Minimum suspension after a successful write.
    pub post_delay: Option<Duration>,
}

impl CommandEntry {
    /// Short write.
    pub const fn short(opcode: u8, payload: &'static [u8]) -> Self {
        Self {
            opcode,
            payload,
            encoding: Encoding::Short,
            post_delay: None,
        }
    }

    /// Long write.
    pub const fn long(opcode: u8, payload: &'static [u8]) -> Self {
        Self {
            opcode,
            payload,
            encoding: Encoding::Long,
            post_delay: None,
        }
    }

    /// Same entry followed by a settle time of `ms` milliseconds.
    #[must_use]
    pub const fn delay_ms(self, ms: u64) -> Self {
        self.with_delay(Duration::from_millis(ms))
    }

    /// Same entry followed by `delay`.
    #[must_use]
    pub const fn with_delay(self, delay: Duration) -> Self {
        Self {
            post_delay: Some(delay),
            ..self
        }
    }

    /// Opcode plus payload length on the wire.
    pub const fn wire_len(&self) -> usize {
        self.payload.len().saturating_add(1)
    }

    /// Check the payload length against the encoding.
    pub fn validate(&self) -> Result<(), EntryError> {
        let len = self.payload.len();
        match self.encoding {
            Encoding::Short if !(1..=2).contains(&len) => {
                Err(EntryError::ShortPayloadLength { len })
            }
            Encoding::Long if self.wire_len() > MAX_PACKET_LEN => {
                Err(EntryError::LongPayloadTooLong { len })
            }
            _ => Ok(()),
        }
    }
}

/// Payload/encoding mismatch in one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryError {
    /// Short writes carry one or two parameter bytes.
    ShortPayloadLength {
        /// Offending payload length.
        len: usize,
    },
    /// Long write does not fit the packet buffer.
    LongPayloadTooLong {
        /// Offending payload length.
        len: usize,
    },
}

impl core::fmt::Display for EntryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ShortPayloadLength { len } => {
                write!(f, "short write with {len} parameter bytes (expected 1 or 2)")
            }
            Self::LongPayloadTooLong { len } => write!(
                f,
                "long write with {len} parameter bytes (max {})",
                MAX_PACKET_LEN.saturating_sub(1)
            ),
        }
    }
}

/// Invalid entry inside a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceError {
    /// Position of the entry.
    pub index: usize,
    /// What is wrong with it.
    pub kind: EntryError,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "entry {}: {}", self.index, self.kind)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}

/// Named, ordered command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandSequence {
    name: &'static str,
    entries: &'static [CommandEntry],
}

impl CommandSequence {
    /// Table with no entries.
    pub const EMPTY: Self = Self::new("empty", &[]);

    /// Wrap a static table.
    pub const fn new(name: &'static str, entries: &'static [CommandEntry]) -> Self {
        Self { name, entries }
    }

    /// Name used in logs and errors.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Entries in execution order.
    pub const fn entries(&self) -> &'static [CommandEntry] {
        self.entries
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there is nothing to send.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in execution order.
    pub fn iter(&self) -> core::slice::Iter<'static, CommandEntry> {
        self.entries.iter()
    }

    /// Sum of all post-delays.
    pub fn total_delay(&self) -> Duration {
        self.iter()
            .filter_map(|e| e.post_delay)
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Reject the first entry whose payload disagrees with its encoding.
    pub fn validate(&self) -> Result<(), SequenceError> {
        for (index, entry) in self.iter().enumerate() {
            entry
                .validate()
                .map_err(|kind| SequenceError { index, kind })?;
        }
        Ok(())
    }
}

impl IntoIterator for &CommandSequence {
    type Item = &'static CommandEntry;
    type IntoIter = core::slice::Iter<'static, CommandEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
