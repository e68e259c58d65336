//! Chipone controller panels

use core::time::Duration;

use panel_hal::{dcs, ModeFlags, PixelFormat};

use crate::{
    BacklightConfig, CommandEntry, CommandSequence, Controller, DisplayMode, PanelDescriptor,
    PowerTimings, ResetSequence, ResetStep,
};

const DXQ7D0023_MODE: DisplayMode = DisplayMode {
    clock_khz: 155_493,
    hdisplay: 1200,
    hsync_start: 1200 + 48,
    hsync_end: 1200 + 48 + 32,
    htotal: 1200 + 48 + 32 + 60,
    vdisplay: 1920,
    vsync_start: 1920 + 3,
    vsync_end: 1920 + 3 + 5,
    vtotal: 1920 + 3 + 5 + 6,
};

const DXQ7D0023_RESET: [ResetStep; 4] = [
    ResetStep::assert_ms(10),
    ResetStep::release_ms(3),
    ResetStep::assert_ms(7),
    ResetStep::release_ms(15),
];

/// Unlock manufacturer registers, configure brightness control, enable TE.
const DXQ7D0023_INIT: [CommandEntry; 6] = [
    CommandEntry::short(0x9C, &[0xA5, 0xA5]),
    CommandEntry::short(0xFD, &[0x5A, 0x5A]),
    CommandEntry::short(0x48, &[0x03]),
    CommandEntry::short(dcs::WRITE_CONTROL_DISPLAY, &[0x00]),
    CommandEntry::short(dcs::SET_DISPLAY_BRIGHTNESS, &[0x00, 0x00]),
    CommandEntry::short(dcs::SET_TEAR_ON, &[0x35]),
];

/// Only accepted once the charge pumps run.
const DXQ7D0023_POST_SLEEP_OUT: [CommandEntry; 3] = [
    CommandEntry::short(dcs::SET_DISPLAY_BRIGHTNESS, &[0x0D, 0xBB]),
    CommandEntry::short(0x9F, &[0x0F]),
    CommandEntry::short(0xCE, &[0x22]),
];

/// DXQ 7" 1200×1920 video-mode panel on a Chipone ICNA3512
///
/// - Supplies: `vddp`, `iovcc`, then the `dcdc-en` converter enable
/// - 4 lanes RGB888, non-continuous clock, HSE packets
/// - 95×151 mm active area
pub const ICNA3512_DXQ7D0023: PanelDescriptor = PanelDescriptor {
    name: "DXQ7D0023 (ICNA3512)",
    compatible: "dxq,dxq7d0023",
    controller: Controller::ChiponeIcna3512,
    lanes: 4,
    format: PixelFormat::Rgb888,
    mode_flags: ModeFlags::VIDEO_HSE
        .union(ModeFlags::VIDEO)
        .union(ModeFlags::CLOCK_NON_CONTINUOUS),
    channel: 0,
    modes: &[DXQ7D0023_MODE],
    width_mm: 95,
    height_mm: 151,
    supplies: &["vddp", "iovcc", "dcdc-en"],
    reset: ResetSequence::new(&DXQ7D0023_RESET),
    init: CommandSequence::new("init", &DXQ7D0023_INIT),
    post_sleep_out: CommandSequence::new("post-sleep-out", &DXQ7D0023_POST_SLEEP_OUT),
    timings: PowerTimings {
        power_on_settle: Duration::from_micros(10),
        sleep_out: Duration::from_millis(120),
        sleep_in: Duration::from_millis(100),
    },
    backlight: BacklightConfig::RAW_8BIT,
};
