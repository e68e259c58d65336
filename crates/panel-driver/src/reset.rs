//! Reset sequencer

use embedded_hal_async::delay::DelayNs;
use panel_hal::{ResetLevel, ResetLine};
use panel_specs::ResetSequence;

use crate::timing::wait_at_least;

/// Drives a reset line through timed level changes.
pub struct ResetSequencer<L> {
    line: L,
}

impl<L: ResetLine> ResetSequencer<L> {
    /// Wrap a reset line. The line is not touched until [`run`](Self::run)
    /// or [`assert`](Self::assert).
    pub fn new(line: L) -> Self {
        Self { line }
    }

    /// Set each level and hold it for at least the step's duration.
    ///
    /// Steps run strictly in order. A line error stops the train at that
    /// step and is returned; the remaining steps are not driven. With an
    /// infallible line (`Error = Infallible`, as on most GPIO HALs) every
    /// step always runs.
    pub async fn run<D: DelayNs>(
        &mut self,
        sequence: &ResetSequence,
        delay: &mut D,
    ) -> Result<(), L::Error> {
        trace!("reset: {} steps", sequence.len());
        for step in sequence.steps() {
            self.line.set_level(step.level)?;
            wait_at_least(delay, step.hold).await;
        }
        Ok(())
    }

    /// Hold the controller in reset (the safe level while unpowered).
    pub fn assert(&mut self) -> Result<(), L::Error> {
        self.line.set_level(ResetLevel::Asserted)
    }

    /// Give the line back.
    pub fn release(self) -> L {
        self.line
    }
}
