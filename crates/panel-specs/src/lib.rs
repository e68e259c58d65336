//! MIPI-DSI Panel Specifications
//!
//! Static descriptions of DSI panels: link parameters, video modes, supply
//! names, reset pulse trains, vendor command tables and settle times.
//!
//! # Features
//!
//! - **no_std compatible** - all tables are `const` data
//! - **Panel templates** - pre-configured descriptors in [`panels`]
//! - **Serde support** - optional serialization for inspection and tooling
//! - **Validation** - [`PanelDescriptor::validate`] rejects malformed tables
//!   before they reach hardware
//!
//! # Example
//!
//! ```
//! use panel_specs::panels::find_by_compatible;
//!
//! let panel = find_by_compatible("dxq,dxq7d0023").unwrap();
//! let mode = panel.preferred_mode().unwrap();
//! println!("{}: {} @ {} Hz", panel.name, mode, mode.vrefresh());
//! assert!(panel.validate().is_ok());
//! ```
//!
//! # Custom Panels
//!
//! ```
//! use core::time::Duration;
//! use panel_hal::{ModeFlags, PixelFormat};
//! use panel_specs::{
//!     BacklightConfig, CommandEntry, CommandSequence, Controller, DisplayMode,
//!     PanelDescriptor, PowerTimings, ResetSequence, ResetStep,
//! };
//!
//! const RESET: [ResetStep; 2] = [ResetStep::assert_ms(10), ResetStep::release_ms(120)];
//! const INIT: [CommandEntry; 1] = [CommandEntry::short(0x36, &[0x00])];
//!
//! const MY_PANEL: PanelDescriptor = PanelDescriptor {
//!     name: "Custom Panel",
//!     compatible: "acme,custom",
//!     controller: Controller::GenericDcs,
//!     lanes: 2,
//!     format: PixelFormat::Rgb888,
//!     mode_flags: ModeFlags::VIDEO,
//!     channel: 0,
//!     modes: &[DisplayMode {
//!         clock_khz: 27_000,
//!         hdisplay: 480, hsync_start: 490, hsync_end: 500, htotal: 520,
//!         vdisplay: 800, vsync_start: 810, vsync_end: 812, vtotal: 820,
//!     }],
//!     width_mm: 52,
//!     height_mm: 86,
//!     supplies: &["vdd"],
//!     reset: ResetSequence::new(&RESET),
//!     init: CommandSequence::new("init", &INIT),
//!     post_sleep_out: CommandSequence::EMPTY,
//!     timings: PowerTimings {
//!         power_on_settle: Duration::from_millis(1),
//!         sleep_out: Duration::from_millis(120),
//!         sleep_in: Duration::from_millis(60),
//!     },
//!     backlight: BacklightConfig::RAW_8BIT,
//! };
//!
//! assert!(MY_PANEL.validate().is_ok());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod command;
mod descriptor;
mod mode;
pub mod panels;
pub mod reset;

pub use command::{CommandEntry, CommandSequence, Encoding, EntryError, SequenceError};
pub use descriptor::{BacklightConfig, Controller, DescriptorError, PanelDescriptor, PowerTimings};
pub use mode::DisplayMode;
pub use reset::{ResetSequence, ResetStep};
