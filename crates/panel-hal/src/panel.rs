//! Panel lifecycle contract
//!
//! The four entry points mirror the DRM panel hooks: power up and initialise
//! (`prepare`), show the image (`enable`), and their inverses.

/// Lifecycle position of one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Rails off, reset asserted.
    #[default]
    Unprepared,
    /// Powered and initialised, output dark.
    Prepared,
    /// Showing frames, backlight on.
    Enabled,
}

impl LifecycleState {
    /// Short lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unprepared => "unprepared",
            Self::Prepared => "prepared",
            Self::Enabled => "enabled",
        }
    }
}

/// DRM-style panel entry points
///
/// Every entry point is a no-op when its target state already holds.
pub trait PanelLifecycle {
    /// Error type
    type Error: core::fmt::Debug;

    /// Power up, reset and initialise the controller.
    async fn prepare(&mut self) -> Result<(), Self::Error>;

    /// Turn the display output and backlight on.
    async fn enable(&mut self) -> Result<(), Self::Error>;

    /// Turn the backlight off; the controller stays initialised.
    async fn disable(&mut self) -> Result<(), Self::Error>;

    /// Put the controller to sleep and remove power.
    async fn unprepare(&mut self) -> Result<(), Self::Error>;

    /// Current lifecycle state.
    fn state(&self) -> LifecycleState;
}
