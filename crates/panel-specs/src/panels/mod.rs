//! Pre-configured panel descriptors
//!
//! Look a descriptor up by device identity with [`find_by_compatible`].

pub mod chipone;

pub use chipone::*;

use crate::PanelDescriptor;

/// Every descriptor shipped with this crate.
pub const ALL: &[&PanelDescriptor] = &[&ICNA3512_DXQ7D0023];

/// Descriptor whose `compatible` string equals `compatible`.
pub fn find_by_compatible(compatible: &str) -> Option<&'static PanelDescriptor> {
    ALL.iter().copied().find(|d| d.compatible == compatible)
}
