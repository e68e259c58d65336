//! Reset pulse trains

use core::time::Duration;

use panel_hal::ResetLevel;

/// Drive the reset line to `level` and hold it at least `hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetStep {
    /// Logical level.
    pub level: ResetLevel,
    /// Minimum time before the next step.
    pub hold: Duration,
}

impl ResetStep {
    /// Assert reset for at least `ms` milliseconds.
    pub const fn assert_ms(ms: u64) -> Self {
        Self {
            level: ResetLevel::Asserted,
            hold: Duration::from_millis(ms),
        }
    }

    /// Release reset for at least `ms` milliseconds.
    pub const fn release_ms(ms: u64) -> Self {
        Self {
            level: ResetLevel::Released,
            hold: Duration::from_millis(ms),
        }
    }
}

/// Ordered reset pulse train
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResetSequence {
    steps: &'static [ResetStep],
}

impl ResetSequence {
    /// Wrap a static step table.
    pub const fn new(steps: &'static [ResetStep]) -> Self {
        Self { steps }
    }

    /// Steps in execution order.
    pub const fn steps(&self) -> &'static [ResetStep] {
        self.steps
    }

    /// Number of level changes.
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the sequence does nothing.
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Level the line is left at.
    pub fn final_level(&self) -> Option<ResetLevel> {
        self.steps.last().map(|s| s.level)
    }

    /// Minimum wall time of the whole train.
    pub fn total_hold(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| s.hold)
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}
