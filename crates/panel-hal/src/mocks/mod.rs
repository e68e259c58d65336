//! Mock implementations for testing
//!
//! Every mock writes into one shared [`Journal`], so a test can assert the
//! interleaving of rail, reset-line, DSI and delay activity. [`VirtualDelay`]
//! advances the journal's clock instead of sleeping; each record carries the
//! virtual time at which it happened.

#![cfg(any(test, feature = "std"))]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::dcs;
use crate::dsi::{DataType, DsiHost, ModeFlags, Packet};
use crate::gpio::PinState;
use crate::power::Regulator;

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Something a mock observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Rail switched on.
    RailEnabled(&'static str),
    /// Rail switched off.
    RailDisabled(&'static str),
    /// Rail refused an enable or disable request.
    RailFailed(&'static str),
    /// Reset pin driven to an electrical level.
    Pin(PinState),
    /// DSI packet offered to the host.
    Write {
        /// Packet data type.
        data_type: DataType,
        /// Opcode and parameters.
        data: Vec<u8>,
        /// LPM flag at the time of the write.
        low_power: bool,
        /// False when the write was failed by an armed [`Fault`].
        accepted: bool,
    },
    /// DCS read request.
    Read {
        /// Requested opcode.
        opcode: u8,
        /// LPM flag at the time of the read.
        low_power: bool,
    },
    /// Suspension on the virtual clock.
    Delay {
        /// Requested duration.
        ns: u64,
    },
}

/// Timestamped [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Virtual time in nanoseconds when the event was recorded.
    pub at_ns: u64,
    /// What happened.
    pub event: Event,
}

#[derive(Default)]
struct JournalInner {
    now_ns: Cell<u64>,
    records: RefCell<Vec<Record>>,
}

/// Shared event log plus virtual clock. Clones share the same log.
#[derive(Clone, Default)]
pub struct Journal {
    inner: Rc<JournalInner>,
}

impl Journal {
    /// Empty journal at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now_ns(&self) -> u64 {
        self.inner.now_ns.get()
    }

    /// Move the virtual clock forward.
    pub fn advance(&self, ns: u64) {
        let now = self.inner.now_ns.get().saturating_add(ns);
        self.inner.now_ns.set(now);
    }

    /// Append an event at the current virtual time.
    pub fn push(&self, event: Event) {
        let at_ns = self.now_ns();
        self.inner.records.borrow_mut().push(Record { at_ns, event });
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<Record> {
        self.inner.records.borrow().clone()
    }

    /// Snapshot of all events without timestamps.
    pub fn events(&self) -> Vec<Event> {
        self.inner
            .records
            .borrow()
            .iter()
            .map(|r| r.event.clone())
            .collect()
    }

    /// Forget all records. The clock keeps running.
    pub fn clear(&self) {
        self.inner.records.borrow_mut().clear();
    }

    /// Accepted DSI writes as `(time, opcode + parameters)`.
    pub fn writes(&self) -> Vec<(u64, Vec<u8>)> {
        self.inner
            .records
            .borrow()
            .iter()
            .filter_map(|r| match &r.event {
                Event::Write {
                    data,
                    accepted: true,
                    ..
                } => Some((r.at_ns, data.clone())),
                _ => None,
            })
            .collect()
    }

    /// Opcodes of every write offered to the host, accepted or not.
    pub fn attempted_opcodes(&self) -> Vec<u8> {
        self.inner
            .records
            .borrow()
            .iter()
            .filter_map(|r| match &r.event {
                Event::Write { data, .. } => data.first().copied(),
                _ => None,
            })
            .collect()
    }

    /// Rails currently on, in the order they were switched on.
    pub fn enabled_rails(&self) -> Vec<&'static str> {
        let mut on: Vec<&'static str> = Vec::new();
        for record in self.inner.records.borrow().iter() {
            match record.event {
                Event::RailEnabled(name) => on.push(name),
                Event::RailDisabled(name) => on.retain(|n| *n != name),
                _ => {}
            }
        }
        on
    }

    /// Reset pin levels in the order they were driven.
    pub fn pin_levels(&self) -> Vec<PinState> {
        self.inner
            .records
            .borrow()
            .iter()
            .filter_map(|r| match r.event {
                Event::Pin(level) => Some(level),
                _ => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

/// Shared failure switch.
///
/// After [`Fault::fail_after`]`(n)` the next `n` operations succeed and every
/// later one fails until [`Fault::clear`].
#[derive(Debug, Clone, Default)]
pub struct Fault(Rc<Cell<Option<usize>>>);

impl Fault {
    /// Fail every operation from now on.
    pub fn arm(&self) {
        self.0.set(Some(0));
    }

    /// Let `n` operations through, then fail.
    pub fn fail_after(&self, n: usize) {
        self.0.set(Some(n));
    }

    /// Stop failing.
    pub fn clear(&self) {
        self.0.set(None);
    }

    /// Consume one operation; true if it must fail.
    pub fn trip(&self) -> bool {
        match self.0.get() {
            None => false,
            Some(0) => true,
            Some(n) => {
                self.0.set(Some(n.saturating_sub(1)));
                false
            }
        }
    }
}

/// Error returned by mocks when a [`Fault`] trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Injected by the test.
    Injected,
}

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Injected => write!(f, "injected failure"),
        }
    }
}

impl std::error::Error for MockError {}

// ---------------------------------------------------------------------------
// Regulator
// ---------------------------------------------------------------------------

/// Recording regulator
pub struct MockRegulator {
    name: &'static str,
    journal: Journal,
    enable_fault: Fault,
    disable_fault: Fault,
}

impl MockRegulator {
    /// Regulator called `name` logging into `journal`.
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            enable_fault: Fault::default(),
            disable_fault: Fault::default(),
        }
    }

    /// Rail name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Switch controlling enable failures.
    pub fn enable_fault(&self) -> Fault {
        self.enable_fault.clone()
    }

    /// Switch controlling disable failures.
    pub fn disable_fault(&self) -> Fault {
        self.disable_fault.clone()
    }
}

impl Regulator for MockRegulator {
    type Error = MockError;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        if self.enable_fault.trip() {
            self.journal.push(Event::RailFailed(self.name));
            return Err(MockError::Injected);
        }
        self.journal.push(Event::RailEnabled(self.name));
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        if self.disable_fault.trip() {
            self.journal.push(Event::RailFailed(self.name));
            return Err(MockError::Injected);
        }
        self.journal.push(Event::RailDisabled(self.name));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reset pin
// ---------------------------------------------------------------------------

/// Recording output pin
pub struct MockResetPin {
    journal: Journal,
}

impl MockResetPin {
    /// Pin logging into `journal`.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl ErrorType for MockResetPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.journal.push(Event::Pin(PinState::Low));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.journal.push(Event::Pin(PinState::High));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DSI host
// ---------------------------------------------------------------------------

/// Recording DSI host
///
/// Remembers the last `SET_DISPLAY_BRIGHTNESS` parameters and answers
/// `GET_DISPLAY_BRIGHTNESS` with them, like a controller that latches the
/// register.
pub struct MockDsiHost {
    journal: Journal,
    flags: ModeFlags,
    brightness: [u8; 2],
    write_fault: Fault,
    read_fault: Fault,
}

impl MockDsiHost {
    /// Host logging into `journal`, no mode flags set.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            flags: ModeFlags::empty(),
            brightness: [0; 2],
            write_fault: Fault::default(),
            read_fault: Fault::default(),
        }
    }

    /// Switch controlling write failures.
    pub fn write_fault(&self) -> Fault {
        self.write_fault.clone()
    }

    /// Switch controlling read failures.
    pub fn read_fault(&self) -> Fault {
        self.read_fault.clone()
    }

    /// Preload the brightness register, as if the controller reset to `raw`.
    pub fn set_brightness_register(&mut self, raw: u16) {
        self.brightness = raw.to_le_bytes();
    }

    /// Current brightness register.
    pub fn brightness_register(&self) -> u16 {
        u16::from_le_bytes(self.brightness)
    }
}

impl DsiHost for MockDsiHost {
    type Error = MockError;

    async fn write(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error> {
        let accepted = !self.write_fault.trip();
        self.journal.push(Event::Write {
            data_type: packet.data_type,
            data: packet.data.to_vec(),
            low_power: self.flags.contains(ModeFlags::LPM),
            accepted,
        });
        if !accepted {
            return Err(MockError::Injected);
        }
        if let [dcs::SET_DISPLAY_BRIGHTNESS, params @ ..] = packet.data {
            let mut latched = [0u8; 2];
            for (dst, src) in latched.iter_mut().zip(params) {
                *dst = *src;
            }
            self.brightness = latched;
        }
        embassy_futures::yield_now().await;
        Ok(())
    }

    async fn read(&mut self, packet: &Packet<'_>, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let opcode = packet.opcode().unwrap_or(dcs::NOP);
        self.journal.push(Event::Read {
            opcode,
            low_power: self.flags.contains(ModeFlags::LPM),
        });
        if self.read_fault.trip() {
            return Err(MockError::Injected);
        }
        embassy_futures::yield_now().await;
        if opcode != dcs::GET_DISPLAY_BRIGHTNESS {
            return Ok(0);
        }
        let n = buf
            .iter_mut()
            .zip(self.brightness)
            .map(|(dst, src)| *dst = src)
            .count();
        Ok(n)
    }

    fn mode_flags(&self) -> ModeFlags {
        self.flags
    }

    fn set_mode_flags(&mut self, flags: ModeFlags) {
        self.flags = flags;
    }
}

// ---------------------------------------------------------------------------
// Delay
// ---------------------------------------------------------------------------

/// [`DelayNs`] on the journal's virtual clock
///
/// Advances the clock by exactly the requested amount and yields once, so
/// concurrently polled futures get a chance to run.
pub struct VirtualDelay {
    journal: Journal,
}

impl VirtualDelay {
    /// Delay driving `journal`'s clock.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }

    async fn sleep(&mut self, ns: u64) {
        self.journal.push(Event::Delay { ns });
        self.journal.advance(ns);
        embassy_futures::yield_now().await;
    }
}

impl DelayNs for VirtualDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.sleep(u64::from(ns)).await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.sleep(u64::from(us).saturating_mul(1_000)).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.sleep(u64::from(ms).saturating_mul(1_000_000)).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn journal_timestamps_follow_virtual_clock() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        let mut delay = VirtualDelay::new(&journal);

        host.write(&Packet::dcs_short(0, &[dcs::EXIT_SLEEP_MODE]))
            .await
            .unwrap();
        delay.delay_ms(120).await;
        host.write(&Packet::dcs_short(0, &[dcs::SET_DISPLAY_ON]))
            .await
            .unwrap();

        let writes = journal.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].0 - writes[0].0, 120_000_000);
    }

    #[tokio::test]
    async fn fault_lets_n_operations_through() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.write_fault().fail_after(1);

        assert!(host.write(&Packet::dcs_short(0, &[0x01])).await.is_ok());
        assert_eq!(
            host.write(&Packet::dcs_short(0, &[0x02])).await,
            Err(MockError::Injected)
        );
        assert_eq!(journal.attempted_opcodes(), vec![0x01, 0x02]);
        assert_eq!(journal.writes().len(), 1);
    }

    #[tokio::test]
    async fn brightness_register_echoes() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.write(&Packet::dcs_long(0, &[dcs::SET_DISPLAY_BRIGHTNESS, 0x0D, 0xBB]))
            .await
            .unwrap();
        assert_eq!(host.brightness_register(), 0xBB0D);

        let mut buf = [0u8; 2];
        let n = host
            .read(&Packet::dcs_read(0, &[dcs::GET_DISPLAY_BRIGHTNESS]), &mut buf)
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(buf, [0x0D, 0xBB]);
    }

    #[tokio::test]
    async fn enabled_rails_tracks_on_off() {
        let journal = Journal::new();
        let mut a = MockRegulator::new("a", &journal);
        let mut b = MockRegulator::new("b", &journal);
        a.enable().await.unwrap();
        b.enable().await.unwrap();
        a.disable().await.unwrap();
        assert_eq!(journal.enabled_rails(), vec!["b"]);
    }

    #[test]
    fn reset_pin_records_levels() {
        let journal = Journal::new();
        let mut pin = MockResetPin::new(&journal);
        pin.set_low().unwrap();
        pin.set_high().unwrap();
        assert_eq!(journal.pin_levels(), vec![PinState::Low, PinState::High]);
    }
}
