//! MIPI-DSI Panel Driver
//!
//! Brings a DSI panel from unpowered to showing frames and back: ordered rail
//! enablement with rollback, a timed reset pulse train, vendor init tables
//! over DCS, and brightness control that steps around low-power-mode traffic.
//!
//! # Architecture
//!
//! ```text
//! SharedPanel (serialized entry points)
//!         ↓
//! Panel lifecycle (prepare / enable / disable / unprepare)
//!         ↓
//! PowerSequencer · ResetSequencer · CommandInterpreter · brightness bridge
//!         ↓
//! panel-hal resource handles (DsiHost, Regulator, ResetLine, DelayNs)
//! ```
//!
//! Every suspension goes through the caller's `DelayNs`, so tests substitute a
//! virtual clock and assert minimum spacing without sleeping.
//!
//! # Features
//!
//! - `std` - `std::error::Error` impls
//! - `defmt` - log through defmt (hardware builds)
//! - `tracing` - log through tracing (host builds)
//! - `serde` - serializable panel descriptors
//!
//! # Example
//!
//! ```
//! use panel_driver::Panel;
//! use panel_hal::mocks::{Journal, MockDsiHost, MockRegulator, MockResetPin, VirtualDelay};
//! use panel_hal::{LifecycleState, Polarity, ResetPin};
//! use panel_specs::panels::ICNA3512_DXQ7D0023;
//!
//! # embassy_futures::block_on(async {
//! let journal = Journal::new();
//! let rails = ["vddp", "iovcc", "dcdc-en"].map(|name| MockRegulator::new(name, &journal));
//! let mut panel = Panel::new(
//!     &ICNA3512_DXQ7D0023,
//!     MockDsiHost::new(&journal),
//!     rails,
//!     ResetPin::new(MockResetPin::new(&journal), Polarity::ActiveLow),
//!     VirtualDelay::new(&journal),
//! )
//! .unwrap();
//!
//! panel.prepare().await.unwrap();
//! panel.enable().await.unwrap();
//! assert_eq!(panel.state(), LifecycleState::Enabled);
//! panel.unprepare().await.unwrap();
//! assert!(journal.enabled_rails().is_empty());
//! # });
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(async_fn_in_trait)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod backlight;
pub mod command;
pub mod error;
pub mod panel;
pub mod power;
pub mod reset;
pub mod shared;
mod timing;

pub use backlight::{read_brightness, write_brightness, DcsBacklight, LpmGuard};
pub use command::{dcs_write, CommandInterpreter};
pub use error::{CommandError, CommandFault, PanelError, RailError, RailFailures, ResourceError};
pub use panel::{LifecycleError, Panel};
pub use power::{PowerRail, PowerSequencer};
pub use reset::ResetSequencer;
pub use shared::SharedPanel;
