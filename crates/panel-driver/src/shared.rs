//! Serialized access to one panel from several tasks
//!
//! Lifecycle entry points on a [`SharedPanel`] run to completion one at a
//! time: a `prepare` started by one task finishes (or unwinds) before a
//! concurrent `unprepare` observes the state. Use
//! `CriticalSectionRawMutex` when tasks run on different executors or in
//! interrupts, `NoopRawMutex` when they share a single executor.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use panel_hal::{LifecycleState, PanelLifecycle};

/// A [`PanelLifecycle`] behind an async mutex.
pub struct SharedPanel<M: RawMutex, P> {
    inner: Mutex<M, P>,
}

impl<M: RawMutex, P: PanelLifecycle> SharedPanel<M, P> {
    /// Wrap `panel`.
    pub const fn new(panel: P) -> Self {
        Self {
            inner: Mutex::new(panel),
        }
    }

    /// See [`PanelLifecycle::prepare`].
    pub async fn prepare(&self) -> Result<(), P::Error> {
        self.inner.lock().await.prepare().await
    }

    /// See [`PanelLifecycle::enable`].
    pub async fn enable(&self) -> Result<(), P::Error> {
        self.inner.lock().await.enable().await
    }

    /// See [`PanelLifecycle::disable`].
    pub async fn disable(&self) -> Result<(), P::Error> {
        self.inner.lock().await.disable().await
    }

    /// See [`PanelLifecycle::unprepare`].
    pub async fn unprepare(&self) -> Result<(), P::Error> {
        self.inner.lock().await.unprepare().await
    }

    /// State once any in-flight transition has finished.
    pub async fn state(&self) -> LifecycleState {
        self.inner.lock().await.state()
    }

    /// Exclusive access for anything beyond the lifecycle entry points.
    pub async fn lock(&self) -> MutexGuard<'_, M, P> {
        self.inner.lock().await
    }

    /// Take the panel back out.
    pub fn into_inner(self) -> P {
        self.inner.into_inner()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Panel;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use panel_hal::dcs;
    use panel_hal::mocks::{Event, Journal, MockDsiHost, MockRegulator, MockResetPin, VirtualDelay};
    use panel_hal::{Polarity, ResetPin};
    use panel_specs::panels::ICNA3512_DXQ7D0023;

    type TestPanel = Panel<MockDsiHost, MockRegulator, ResetPin<MockResetPin>, VirtualDelay, 3>;

    fn shared(journal: &Journal) -> SharedPanel<NoopRawMutex, TestPanel> {
        SharedPanel::new(
            Panel::new(
                &ICNA3512_DXQ7D0023,
                MockDsiHost::new(journal),
                ["vddp", "iovcc", "dcdc-en"].map(|n| MockRegulator::new(n, journal)),
                ResetPin::new(MockResetPin::new(journal), Polarity::ActiveLow),
                VirtualDelay::new(journal),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn prepare_and_unprepare_do_not_interleave() {
        let journal = Journal::new();
        let panel = shared(&journal);

        let (a, b) = join(panel.prepare(), panel.unprepare()).await;
        a.unwrap();
        b.unwrap();

        // The unprepare waited for the whole prepare, so every rail-off comes
        // after the last post-sleep-out command.
        let events = journal.events();
        let last_write = events
            .iter()
            .rposition(|e| matches!(e, Event::Write { data, .. } if data.first() == Some(&0xCE)))
            .unwrap();
        let first_off = events
            .iter()
            .position(|e| matches!(e, Event::RailDisabled(_)))
            .unwrap();
        assert!(last_write < first_off);
        assert_eq!(panel.state().await, LifecycleState::Unprepared);
        assert!(journal.enabled_rails().is_empty());
    }

    #[tokio::test]
    async fn concurrent_enables_turn_display_on_once() {
        let journal = Journal::new();
        let panel = shared(&journal);
        panel.prepare().await.unwrap();

        let (a, b) = join(panel.enable(), panel.enable()).await;
        a.unwrap();
        b.unwrap();

        let display_on = journal
            .attempted_opcodes()
            .into_iter()
            .filter(|op| *op == dcs::SET_DISPLAY_ON)
            .count();
        assert_eq!(display_on, 1);
        assert_eq!(panel.state().await, LifecycleState::Enabled);
    }

    #[tokio::test]
    async fn lock_gives_full_panel_access() {
        let journal = Journal::new();
        let panel = shared(&journal);
        panel.prepare().await.unwrap();
        panel.enable().await.unwrap();
        {
            let mut guard = panel.lock().await;
            guard.set_brightness(panel_hal::Brightness::new(7)).await.unwrap();
        }
        let (host, ..) = panel.into_inner().release();
        assert_eq!(host.brightness_register(), 7);
    }
}
