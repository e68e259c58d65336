//! Error types
//!
//! Errors are generic over the collaborator error types so nothing is boxed
//! and the transport's own error survives unchanged.

use core::fmt;

use panel_hal::LifecycleState;
use panel_specs::{DescriptorError, EntryError};

/// A rail refused to switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailError<E> {
    /// Rail name from the descriptor.
    pub rail: &'static str,
    /// Position in power-up order.
    pub index: usize,
    /// Regulator error.
    pub cause: E,
}

#[allow(clippy::use_debug)]
impl<E: fmt::Debug> fmt::Display for RailError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rail {} ({}): {:?}", self.index, self.rail, self.cause)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for RailError<E> {}

/// Every rail that failed to switch off during a power-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailFailures<E, const N: usize> {
    failures: heapless::Vec<RailError<E>, N>,
}

impl<E, const N: usize> RailFailures<E, N> {
    pub(crate) fn new(failures: heapless::Vec<RailError<E>, N>) -> Self {
        Self { failures }
    }

    /// Failures in the order they happened (reverse power-up order).
    pub fn iter(&self) -> core::slice::Iter<'_, RailError<E>> {
        self.failures.iter()
    }

    /// Number of rails that failed.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Never true for a returned error.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first failure, discarding the rest.
    pub fn into_first(self) -> Option<RailError<E>> {
        self.failures.into_iter().next()
    }
}

impl<E: fmt::Debug, const N: usize> fmt::Display for RailFailures<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rail(s) failed to disable", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug, const N: usize> std::error::Error for RailFailures<E, N> {}

/// Why a table entry could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFault<E> {
    /// The host rejected the write.
    Transport(E),
    /// Payload disagrees with the entry's encoding; nothing was sent.
    Malformed(EntryError),
}

#[allow(clippy::use_debug)]
impl<E: fmt::Debug> fmt::Display for CommandFault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
            Self::Malformed(e) => write!(f, "malformed entry: {e}"),
        }
    }
}

/// A command table stopped at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandError<E> {
    /// Table name.
    pub sequence: &'static str,
    /// Position of the failing entry; earlier entries were delivered.
    pub index: usize,
    /// Opcode of the failing entry.
    pub opcode: u8,
    /// Underlying failure.
    pub cause: CommandFault<E>,
}

impl<E: fmt::Debug> fmt::Display for CommandError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sequence stopped at entry {} (opcode {:#04x}): {}",
            self.sequence, self.index, self.opcode, self.cause
        )
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for CommandError<E> {}

/// Invalid configuration or handle set at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// Descriptor failed validation.
    Descriptor(DescriptorError),
    /// Number of rail handles differs from the descriptor's supply list.
    RailCount {
        /// Supplies named by the descriptor.
        expected: usize,
        /// Handles supplied.
        found: usize,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor(e) => write!(f, "invalid panel descriptor: {e}"),
            Self::RailCount { expected, found } => {
                write!(f, "descriptor names {expected} supplies, got {found} handles")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResourceError {}

impl From<DescriptorError> for ResourceError {
    fn from(e: DescriptorError) -> Self {
        Self::Descriptor(e)
    }
}

/// Lifecycle entry point failure.
///
/// `D`, `R` and `P` are the DSI host, regulator and reset line error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelError<D, R, P> {
    /// A rail failed to switch.
    Rail(RailError<R>),
    /// The reset line could not be driven.
    Reset(P),
    /// A command table stopped early.
    Command(CommandError<D>),
    /// A single lifecycle command (sleep, display on/off, brightness) failed.
    Dcs {
        /// Opcode that failed.
        opcode: u8,
        /// Host error.
        cause: D,
    },
    /// The entry point is not valid from the current state.
    InvalidState(LifecycleState),
}

#[allow(clippy::use_debug)]
impl<D: fmt::Debug, R: fmt::Debug, P: fmt::Debug> fmt::Display for PanelError<D, R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rail(e) => write!(f, "{e}"),
            Self::Reset(e) => write!(f, "reset line error: {e:?}"),
            Self::Command(e) => write!(f, "{e}"),
            Self::Dcs { opcode, cause } => write!(f, "command {opcode:#04x} failed: {cause:?}"),
            Self::InvalidState(state) => write!(f, "not allowed while {}", state.as_str()),
        }
    }
}

#[cfg(feature = "std")]
impl<D: fmt::Debug, R: fmt::Debug, P: fmt::Debug> std::error::Error for PanelError<D, R, P> {}
