//! DCS brightness bridge
//!
//! Brightness lives in the controller's `SET_DISPLAY_BRIGHTNESS` register.
//! Reads and writes go out in high-speed mode: the link-wide LPM flag is
//! cleared for the duration of the command by an [`LpmGuard`], which puts the
//! previous value back when it goes out of scope, on every path.

use core::ops::{Deref, DerefMut};

use panel_hal::{dcs, Backlight, BacklightType, Brightness, DsiHost, ModeFlags, Packet};
use panel_specs::BacklightConfig;

/// Clears [`ModeFlags::LPM`] until dropped, then restores the prior value.
pub struct LpmGuard<'a, H: DsiHost> {
    host: &'a mut H,
    restore: bool,
}

impl<'a, H: DsiHost> LpmGuard<'a, H> {
    /// Switch `host` to high-speed commands.
    pub fn high_speed(host: &'a mut H) -> Self {
        let flags = host.mode_flags();
        let restore = flags.contains(ModeFlags::LPM);
        host.set_mode_flags(flags.difference(ModeFlags::LPM));
        Self { host, restore }
    }
}

impl<H: DsiHost> Deref for LpmGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: DsiHost> DerefMut for LpmGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: DsiHost> Drop for LpmGuard<'_, H> {
    fn drop(&mut self) {
        if self.restore {
            let flags = self.host.mode_flags();
            self.host.set_mode_flags(flags.union(ModeFlags::LPM));
        }
    }
}

/// Read `GET_DISPLAY_BRIGHTNESS` (two bytes, little-endian) and apply `mask`.
pub async fn read_brightness<H: DsiHost>(
    host: &mut H,
    channel: u8,
    mask: u16,
) -> Result<Brightness, H::Error> {
    let mut guard = LpmGuard::high_speed(host);
    let mut raw = [0u8; 2];
    guard
        .read(
            &Packet::dcs_read(channel, &[dcs::GET_DISPLAY_BRIGHTNESS]),
            &mut raw,
        )
        .await?;
    Ok(Brightness::new(u16::from_le_bytes(raw) & mask))
}

/// Write `level` to `SET_DISPLAY_BRIGHTNESS` as `[low, high]`.
pub async fn write_brightness<H: DsiHost>(
    host: &mut H,
    channel: u8,
    level: Brightness,
) -> Result<(), H::Error> {
    let mut guard = LpmGuard::high_speed(host);
    let [lo, hi] = level.get().to_le_bytes();
    guard
        .write(&Packet::dcs_long(
            channel,
            &[dcs::SET_DISPLAY_BRIGHTNESS, lo, hi],
        ))
        .await?;
    Ok(())
}

/// Standalone [`Backlight`] over a DSI host.
pub struct DcsBacklight<H> {
    host: H,
    channel: u8,
    config: BacklightConfig,
}

impl<H: DsiHost> DcsBacklight<H> {
    /// Backlight on `host`, addressing virtual channel `channel`.
    pub fn new(host: H, channel: u8, config: BacklightConfig) -> Self {
        Self {
            host,
            channel,
            config,
        }
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back.
    pub fn release(self) -> H {
        self.host
    }
}

impl<H: DsiHost> Backlight for DcsBacklight<H> {
    type Error = H::Error;

    async fn brightness(&mut self) -> Result<Brightness, Self::Error> {
        read_brightness(&mut self.host, self.channel, self.config.read_mask).await
    }

    async fn set_brightness(&mut self, level: Brightness) -> Result<(), Self::Error> {
        let level = level.clamp_to(self.config.max_brightness);
        write_brightness(&mut self.host, self.channel, level).await
    }

    fn max_brightness(&self) -> u16 {
        self.config.max_brightness
    }

    fn kind(&self) -> BacklightType {
        self.config.kind
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use panel_hal::mocks::{Event, Journal, MockDsiHost, MockError};
    use panel_hal::DataType;

    #[test]
    fn guard_restores_set_flag() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.set_mode_flags(ModeFlags::VIDEO | ModeFlags::LPM);
        {
            let guard = LpmGuard::high_speed(&mut host);
            assert_eq!(guard.mode_flags(), ModeFlags::VIDEO);
        }
        assert_eq!(host.mode_flags(), ModeFlags::VIDEO | ModeFlags::LPM);
    }

    #[test]
    fn guard_leaves_clear_flag_clear() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.set_mode_flags(ModeFlags::VIDEO);
        drop(LpmGuard::high_speed(&mut host));
        assert_eq!(host.mode_flags(), ModeFlags::VIDEO);
    }

    #[tokio::test]
    async fn failed_read_still_restores_flag() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.set_mode_flags(ModeFlags::LPM);
        host.read_fault().arm();
        assert!(read_brightness(&mut host, 0, 0xFF).await.is_err());
        assert!(host.mode_flags().contains(ModeFlags::LPM));
        assert_eq!(
            journal.events(),
            vec![Event::Read {
                opcode: dcs::GET_DISPLAY_BRIGHTNESS,
                low_power: false
            }]
        );
    }

    #[tokio::test]
    async fn failed_write_still_restores_flag() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.set_mode_flags(ModeFlags::VIDEO | ModeFlags::LPM);
        host.write_fault().arm();
        assert_eq!(
            write_brightness(&mut host, 0, Brightness::new(0x80)).await,
            Err(MockError::Injected)
        );
        assert_eq!(host.mode_flags(), ModeFlags::VIDEO | ModeFlags::LPM);
        assert_eq!(
            journal.events(),
            vec![Event::Write {
                data_type: DataType::DcsLongWrite,
                data: vec![dcs::SET_DISPLAY_BRIGHTNESS, 0x80, 0x00],
                low_power: false,
                accepted: false,
            }]
        );
    }

    #[tokio::test]
    async fn read_masks_to_eight_bits() {
        let journal = Journal::new();
        let mut host = MockDsiHost::new(&journal);
        host.set_brightness_register(0x0DBB);
        let level = read_brightness(&mut host, 0, 0x00FF).await.unwrap();
        assert_eq!(level, Brightness::new(0xBB));
    }

    #[tokio::test]
    async fn set_clamps_to_max() {
        let journal = Journal::new();
        let mut bl = DcsBacklight::new(MockDsiHost::new(&journal), 0, BacklightConfig::RAW_8BIT);
        bl.set_brightness(Brightness::new(1000)).await.unwrap();
        assert_eq!(journal.writes()[0].1, vec![dcs::SET_DISPLAY_BRIGHTNESS, 0xFF, 0x00]);
        assert_eq!(bl.max_brightness(), 255);
        assert_eq!(bl.kind(), BacklightType::Raw);
    }
}
