//! Property-based tests for the DCS brightness bridge.
//!
//! Every level in the 8-bit range written through the bridge must read back
//! unchanged, go out in high-speed mode, and leave the link's low-power flag
//! exactly as it found it.

#![allow(clippy::unwrap_used)]

use embassy_futures::block_on;
use panel_driver::{read_brightness, write_brightness, DcsBacklight, Panel};
use panel_hal::mocks::{
    Event, Journal, MockDsiHost, MockRegulator, MockResetPin, VirtualDelay,
};
use panel_hal::{Backlight, Brightness, DsiHost, ModeFlags, Polarity, ResetPin};
use panel_specs::panels::ICNA3512_DXQ7D0023;
use panel_specs::BacklightConfig;

fn high_speed_only(journal: &Journal) -> bool {
    journal.events().iter().all(|e| match e {
        Event::Write { low_power, .. } | Event::Read { low_power, .. } => !low_power,
        _ => true,
    })
}

proptest::proptest! {
    /// Write then read returns the written level for every 8-bit value.
    #[test]
    fn round_trip_full_range(level in 0u16..=255, lpm in proptest::bool::ANY) {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        let before = if lpm { ModeFlags::VIDEO | ModeFlags::LPM } else { ModeFlags::VIDEO };
        host.set_mode_flags(before);

        let read = block_on(async {
            write_brightness(&mut host, 0, Brightness::new(level)).await.unwrap();
            read_brightness(&mut host, 0, 0xFF).await.unwrap()
        });

        assert_eq!(read, Brightness::new(level));
        assert!(high_speed_only(&journal), "LPM must be clear while the command is on the link");
        assert_eq!(host.mode_flags(), before, "LPM restored afterwards");
    }

    /// A refused write still goes out in high-speed mode and puts LPM back.
    #[test]
    fn failed_write_restores_flag(level in 0u16..=255, lpm in proptest::bool::ANY) {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        let before = if lpm { ModeFlags::VIDEO | ModeFlags::LPM } else { ModeFlags::VIDEO };
        host.set_mode_flags(before);
        host.write_fault().arm();

        let result = block_on(write_brightness(&mut host, 0, Brightness::new(level)));

        assert!(result.is_err());
        assert!(high_speed_only(&journal));
        assert_eq!(journal.writes().len(), 0, "nothing accepted");
        assert_eq!(host.mode_flags(), before);
    }

    /// Levels above the maximum are clamped, never wrapped.
    #[test]
    fn backlight_clamps_before_writing(level in 0u16..=u16::MAX) {
        let journal = Journal::new();
        let mut bl = DcsBacklight::new(MockDsiHost::new(&journal), 0, BacklightConfig::RAW_8BIT);

        let read = block_on(async {
            bl.set_brightness(Brightness::new(level)).await.unwrap();
            bl.brightness().await.unwrap()
        });

        assert_eq!(read.get(), level.min(255));
    }

    /// A panel that is enabled reports what was last requested.
    #[test]
    fn enabled_panel_round_trip(level in 0u16..=255) {
        let journal = Journal::new();
        let mut panel = Panel::new(
            &ICNA3512_DXQ7D0023,
            MockDsiHost::new(&journal),
            ["vddp", "iovcc", "dcdc-en"].map(|n| MockRegulator::new(n, &journal)),
            ResetPin::new(MockResetPin::new(&journal), Polarity::ActiveLow),
            VirtualDelay::new(&journal),
        )
        .unwrap();

        let read = block_on(async {
            panel.prepare().await.unwrap();
            panel.enable().await.unwrap();
            journal.clear();
            panel.set_brightness(Brightness::new(level)).await.unwrap();
            panel.brightness().await.unwrap()
        });

        assert_eq!(read, Brightness::new(level));
        assert!(high_speed_only(&journal));
        let (host, ..) = panel.release();
        assert!(
            host.mode_flags().contains(ModeFlags::LPM),
            "enabled panel keeps its low-power command mode"
        );
    }
}
