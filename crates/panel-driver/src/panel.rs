//! Panel lifecycle state machine
//!
//! ```text
//!              prepare()              enable()
//! [Unprepared] ---------> [Prepared] --------> [Enabled]
//!      ^                   |    ^                  |
//!      +---- unprepare() --+    +---- disable() ---+
//! ```
//!
//! `prepare` either reaches Prepared or unwinds completely (rails off, reset
//! asserted). `unprepare` is best-effort and always ends Unprepared. Each
//! entry point is a no-op when its target state already holds.

use embedded_hal_async::delay::DelayNs;
use panel_hal::{
    dcs, Brightness, DsiHost, LifecycleState, ModeFlags, PanelLifecycle, Regulator, ResetLine,
};
use panel_specs::{DisplayMode, PanelDescriptor};

use crate::backlight::{read_brightness, write_brightness};
use crate::command::CommandInterpreter;
use crate::error::{PanelError, ResourceError};
use crate::power::PowerSequencer;
use crate::reset::ResetSequencer;
use crate::timing::wait_at_least;

/// [`PanelError`] for a given set of handles.
pub type LifecycleError<H, R, L> = PanelError<
    <H as DsiHost>::Error,
    <R as Regulator>::Error,
    <L as ResetLine>::Error,
>;

/// One DSI panel and the handles it owns.
///
/// Generic over:
/// - `H` - [`DsiHost`] command channel
/// - `R` - [`Regulator`] for each of the `N` supply rails
/// - `L` - [`ResetLine`]
/// - `D` - [`DelayNs`] used for every settle time
///
/// On hardware supply `embassy_time::Delay` for `D`; in host tests supply
/// `panel_hal::mocks::VirtualDelay`.
pub struct Panel<H, R, L, D, const N: usize> {
    host: H,
    power: PowerSequencer<R, N>,
    reset: ResetSequencer<L>,
    delay: D,
    commands: CommandInterpreter,
    descriptor: PanelDescriptor,
    state: LifecycleState,
    brightness: Brightness,
}

impl<H, R, L, D, const N: usize> Panel<H, R, L, D, N>
where
    H: DsiHost,
    R: Regulator,
    L: ResetLine,
    D: DelayNs,
{
    /// Bind `descriptor` to a set of already-acquired handles.
    ///
    /// `rails` must be in the order of `descriptor.supplies`. The descriptor's
    /// mode flags are applied to `host`. No hardware is touched otherwise.
    pub fn new(
        descriptor: &PanelDescriptor,
        mut host: H,
        rails: [R; N],
        reset: L,
        delay: D,
    ) -> Result<Self, ResourceError> {
        descriptor.validate()?;
        let power = PowerSequencer::new(descriptor.supplies, rails)?;
        host.set_mode_flags(descriptor.mode_flags);
        Ok(Self {
            host,
            power,
            reset: ResetSequencer::new(reset),
            delay,
            commands: CommandInterpreter::new(descriptor.channel),
            descriptor: *descriptor,
            state: LifecycleState::Unprepared,
            brightness: Brightness::new(descriptor.backlight.default_brightness),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Descriptor this panel was built from.
    pub fn descriptor(&self) -> &PanelDescriptor {
        &self.descriptor
    }

    /// Supported modes, preferred first.
    pub fn modes(&self) -> &'static [DisplayMode] {
        self.descriptor.modes
    }

    /// Active area `(width, height)` in millimetres.
    pub fn physical_size_mm(&self) -> (u16, u16) {
        self.descriptor.physical_size_mm()
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Power up, reset and initialise the controller.
    ///
    /// Rails on, settle, reset train, init table, exit sleep, settle,
    /// post-sleep-out table. On any failure every rail is switched off again,
    /// reset is asserted, the state stays Unprepared and the original error
    /// is returned.
    pub async fn prepare(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        if self.state != LifecycleState::Unprepared {
            trace!("{}: prepare ignored, already {}", self.descriptor.name, self.state.as_str());
            return Ok(());
        }
        info!("{}: prepare", self.descriptor.name);

        // enable_all rolls back its own partial progress.
        if let Err(e) = self.power.enable_all().await {
            if self.reset.assert().is_err() {
                warn!("{}: reset assert failed after rail failure", self.descriptor.name);
            }
            return Err(PanelError::Rail(e));
        }

        if let Err(e) = self.power_on().await {
            warn!("{}: prepare failed, powering down", self.descriptor.name);
            // Report the original failure, not whatever the unwind hits.
            if self.power_off().await.is_err() {
                warn!("{}: power down after failed prepare incomplete", self.descriptor.name);
            }
            return Err(e);
        }

        self.state = LifecycleState::Prepared;
        info!("{}: prepared", self.descriptor.name);
        Ok(())
    }

    /// Turn the display output on and restore the brightness.
    ///
    /// Only valid from Prepared; from Unprepared this returns
    /// [`PanelError::InvalidState`] without touching hardware. Only the
    /// display-on command can fail this call: if it does, the link flags are
    /// put back and the state stays Prepared. Once the display is on the
    /// state is Enabled, and a failed brightness restore is only logged.
    pub async fn enable(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        match self.state {
            LifecycleState::Enabled => return Ok(()),
            LifecycleState::Unprepared => {
                return Err(PanelError::InvalidState(LifecycleState::Unprepared))
            }
            LifecycleState::Prepared => {}
        }
        info!("{}: enable", self.descriptor.name);

        let flags = self.host.mode_flags();
        self.set_low_power(true);
        if let Err(e) = self.dcs(dcs::SET_DISPLAY_ON).await {
            self.host.set_mode_flags(flags);
            return Err(e);
        }
        self.state = LifecycleState::Enabled;

        if write_brightness(&mut self.host, self.descriptor.channel, self.brightness)
            .await
            .is_err()
        {
            warn!("{}: brightness restore failed", self.descriptor.name);
        }
        Ok(())
    }

    /// Turn the backlight off. The controller stays initialised.
    ///
    /// The state moves to Prepared even if the brightness write fails; that
    /// error is still returned.
    pub async fn disable(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        if self.state != LifecycleState::Enabled {
            return Ok(());
        }
        info!("{}: disable", self.descriptor.name);

        let result = write_brightness(&mut self.host, self.descriptor.channel, Brightness::OFF).await;
        self.state = LifecycleState::Prepared;
        result.map_err(|cause| {
            warn!("{}: backlight off failed", self.descriptor.name);
            PanelError::Dcs {
                opcode: dcs::SET_DISPLAY_BRIGHTNESS,
                cause,
            }
        })
    }

    /// Put the controller to sleep and remove power.
    ///
    /// Best-effort: every step runs even if an earlier one failed, the state
    /// always ends Unprepared, and the first error encountered is returned.
    pub async fn unprepare(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        if self.state == LifecycleState::Unprepared {
            return Ok(());
        }
        info!("{}: unprepare", self.descriptor.name);

        let mut first = None;
        if let Err(e) = self.disable().await {
            first.get_or_insert(e);
        }

        self.set_low_power(false);
        for opcode in [dcs::SET_DISPLAY_OFF, dcs::ENTER_SLEEP_MODE] {
            if let Err(e) = self.dcs(opcode).await {
                warn!("{}: command {} failed during unprepare", self.descriptor.name, opcode);
                first.get_or_insert(e);
            }
        }
        wait_at_least(&mut self.delay, self.descriptor.timings.sleep_in).await;

        if let Err(e) = self.power_off().await {
            first.get_or_insert(e);
        }

        self.state = LifecycleState::Unprepared;
        info!("{}: unprepared", self.descriptor.name);
        first.map_or(Ok(()), Err)
    }

    /// System shutdown hook: blank the panel, leave it powered.
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        self.disable().await
    }

    // -----------------------------------------------------------------------
    // Brightness
    // -----------------------------------------------------------------------

    /// Request a brightness level, clamped to the descriptor's maximum.
    ///
    /// Written through immediately while Enabled, otherwise applied by the
    /// next [`enable`](Self::enable).
    pub async fn set_brightness(&mut self, level: Brightness) -> Result<(), LifecycleError<H, R, L>> {
        self.brightness = level.clamp_to(self.descriptor.backlight.max_brightness);
        if self.state != LifecycleState::Enabled {
            return Ok(());
        }
        write_brightness(&mut self.host, self.descriptor.channel, self.brightness)
            .await
            .map_err(|cause| PanelError::Dcs {
                opcode: dcs::SET_DISPLAY_BRIGHTNESS,
                cause,
            })
    }

    /// Brightness as reported by the controller, or the requested level
    /// while unpowered.
    pub async fn brightness(&mut self) -> Result<Brightness, LifecycleError<H, R, L>> {
        if self.state == LifecycleState::Unprepared {
            return Ok(self.brightness);
        }
        read_brightness(
            &mut self.host,
            self.descriptor.channel,
            self.descriptor.backlight.read_mask,
        )
        .await
        .map_err(|cause| PanelError::Dcs {
            opcode: dcs::GET_DISPLAY_BRIGHTNESS,
            cause,
        })
    }

    /// Give every handle back, in constructor order.
    pub fn release(self) -> (H, [R; N], L, D) {
        (
            self.host,
            self.power.into_handles(),
            self.reset.release(),
            self.delay,
        )
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    async fn power_on(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        let timings = self.descriptor.timings;
        wait_at_least(&mut self.delay, timings.power_on_settle).await;

        self.reset
            .run(&self.descriptor.reset, &mut self.delay)
            .await
            .map_err(PanelError::Reset)?;

        self.commands
            .run(&self.descriptor.init, &mut self.host, &mut self.delay)
            .await
            .map_err(PanelError::Command)?;

        self.dcs(dcs::EXIT_SLEEP_MODE).await?;
        wait_at_least(&mut self.delay, timings.sleep_out).await;

        self.commands
            .run(&self.descriptor.post_sleep_out, &mut self.host, &mut self.delay)
            .await
            .map_err(PanelError::Command)
    }

    /// Rails off, then reset asserted. Returns the first failure.
    async fn power_off(&mut self) -> Result<(), LifecycleError<H, R, L>> {
        let rails = self.power.disable_all().await;
        let reset = self.reset.assert();
        if let Err(failures) = rails {
            error!(
                "{}: {} rail(s) failed to power down",
                self.descriptor.name,
                failures.len()
            );
            if let Some(first) = failures.into_first() {
                return Err(PanelError::Rail(first));
            }
        }
        reset.map_err(PanelError::Reset)
    }

    async fn dcs(&mut self, opcode: u8) -> Result<(), LifecycleError<H, R, L>> {
        crate::command::dcs_write(&mut self.host, self.descriptor.channel, &[opcode])
            .await
            .map_err(|cause| PanelError::Dcs { opcode, cause })
    }

    fn set_low_power(&mut self, on: bool) {
        let mut flags = self.host.mode_flags();
        flags.set(ModeFlags::LPM, on);
        self.host.set_mode_flags(flags);
    }
}

impl<H, R, L, D, const N: usize> PanelLifecycle for Panel<H, R, L, D, N>
where
    H: DsiHost,
    R: Regulator,
    L: ResetLine,
    D: DelayNs,
{
    type Error = LifecycleError<H, R, L>;

    async fn prepare(&mut self) -> Result<(), Self::Error> {
        Panel::prepare(self).await
    }

    async fn enable(&mut self) -> Result<(), Self::Error> {
        Panel::enable(self).await
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        Panel::disable(self).await
    }

    async fn unprepare(&mut self) -> Result<(), Self::Error> {
        Panel::unprepare(self).await
    }

    fn state(&self) -> LifecycleState {
        self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use panel_hal::mocks::{Journal, MockDsiHost, MockRegulator, MockResetPin, VirtualDelay};
    use panel_hal::{Polarity, ResetPin};
    use panel_specs::panels::ICNA3512_DXQ7D0023;
    use panel_specs::DescriptorError;

    type TestPanel = Panel<MockDsiHost, MockRegulator, ResetPin<MockResetPin>, VirtualDelay, 3>;

    fn panel(journal: &Journal) -> TestPanel {
        Panel::new(
            &ICNA3512_DXQ7D0023,
            MockDsiHost::new(journal),
            ["vddp", "iovcc", "dcdc-en"].map(|n| MockRegulator::new(n, journal)),
            ResetPin::new(MockResetPin::new(journal), Polarity::ActiveLow),
            VirtualDelay::new(journal),
        )
        .unwrap()
    }

    #[test]
    fn new_applies_link_flags() {
        let journal = Journal::new();
        let p = panel(&journal);
        let (host, ..) = p.release();
        assert_eq!(host.mode_flags(), ICNA3512_DXQ7D0023.mode_flags);
        assert!(journal.events().is_empty());
    }

    #[test]
    fn new_rejects_rail_count_mismatch() {
        let journal = Journal::new();
        let result = Panel::new(
            &ICNA3512_DXQ7D0023,
            MockDsiHost::new(&journal),
            ["vddp", "iovcc"].map(|n| MockRegulator::new(n, &journal)),
            ResetPin::new(MockResetPin::new(&journal), Polarity::ActiveLow),
            VirtualDelay::new(&journal),
        );
        assert_eq!(
            result.err(),
            Some(ResourceError::RailCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn new_rejects_invalid_descriptor() {
        let journal = Journal::new();
        let bad = PanelDescriptor {
            lanes: 0,
            ..ICNA3512_DXQ7D0023
        };
        let result = Panel::new(
            &bad,
            MockDsiHost::new(&journal),
            ["vddp", "iovcc", "dcdc-en"].map(|n| MockRegulator::new(n, &journal)),
            ResetPin::new(MockResetPin::new(&journal), Polarity::ActiveLow),
            VirtualDelay::new(&journal),
        );
        assert_eq!(
            result.err(),
            Some(ResourceError::Descriptor(DescriptorError::InvalidLanes(0)))
        );
    }

    #[tokio::test]
    async fn enable_from_unprepared_is_rejected() {
        let journal = Journal::new();
        let mut p = panel(&journal);
        assert_eq!(
            p.enable().await,
            Err(PanelError::InvalidState(LifecycleState::Unprepared))
        );
        assert!(journal.events().is_empty());
    }

    #[tokio::test]
    async fn brightness_is_deferred_until_enable() {
        let journal = Journal::new();
        let mut p = panel(&journal);
        p.set_brightness(Brightness::new(400)).await.unwrap();
        assert_eq!(p.brightness().await.unwrap(), Brightness::new(255));
        p.set_brightness(Brightness::new(42)).await.unwrap();
        assert!(journal.writes().is_empty());

        p.prepare().await.unwrap();
        p.enable().await.unwrap();
        assert_eq!(p.brightness().await.unwrap(), Brightness::new(42));
    }

    #[test]
    fn exposes_modes_and_size() {
        let journal = Journal::new();
        let p = panel(&journal);
        assert_eq!(p.modes().len(), 1);
        assert_eq!(p.modes()[0].hdisplay, 1200);
        assert_eq!(p.physical_size_mm(), (95, 151));
        assert_eq!(p.descriptor().lanes, 4);
    }
}
