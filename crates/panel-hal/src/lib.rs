//! Hardware abstraction for MIPI-DSI panels
//!
//! Trait-based resource handles for everything a panel driver touches, so the
//! lifecycle logic can be exercised on the host without a display attached.
//!
//! # Architecture Layers
//!
//! ```text
//! Panel lifecycle (panel-driver crate)
//!         ↓
//! Panel tables (panel-specs crate)
//!         ↓
//! Resource handles (this crate - trait abstractions)
//!         ↓
//! DSI host controller / regulators / GPIO
//! ```
//!
//! # Resource handles
//!
//! - [`DsiHost`] - command channel to the display controller
//! - [`Regulator`] - switchable power rail
//! - [`ResetLine`] - reset control line with board polarity applied
//! - [`Backlight`] - brightness get/set
//! - [`PanelLifecycle`] - the four DRM-style panel entry points
//!
//! # Features
//!
//! - `std`: recording mocks in [`mocks`] and `std::error::Error` impls
//! - `serde`: `Serialize`/`Deserialize` for plain value types
//! - `defmt`: `defmt::Format` derives
//!
//! # Example
//!
//! ```no_run
//! use panel_hal::{dcs, DsiHost, Packet};
//!
//! async fn wake<H: DsiHost>(host: &mut H) -> Result<(), H::Error> {
//!     host.write(&Packet::dcs_short(0, &[dcs::EXIT_SLEEP_MODE])).await
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod backlight;
pub mod dcs;
pub mod dsi;
pub mod gpio;
pub mod mocks;
pub mod panel;
pub mod power;

pub use backlight::{Backlight, BacklightType, Brightness};
pub use dsi::{DataType, DsiHost, ModeFlags, Packet, PixelFormat, MAX_PACKET_LEN};
pub use gpio::{PinState, Polarity, ResetLevel, ResetLine, ResetPin};
pub use panel::{LifecycleState, PanelLifecycle};
pub use power::{GpioSupply, Regulator, Supply, SupplyError};
