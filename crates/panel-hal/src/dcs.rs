//! MIPI Display Command Set opcodes used by panel drivers.

/// No operation.
pub const NOP: u8 = 0x00;
/// Software reset.
pub const SOFT_RESET: u8 = 0x01;
/// Read power mode.
pub const GET_POWER_MODE: u8 = 0x0A;
/// Enter sleep mode; the controller needs time to discharge afterwards.
pub const ENTER_SLEEP_MODE: u8 = 0x10;
/// Exit sleep mode; the controller needs time to start its charge pumps.
pub const EXIT_SLEEP_MODE: u8 = 0x11;
/// Blank the display output.
pub const SET_DISPLAY_OFF: u8 = 0x28;
/// Start showing frame memory.
pub const SET_DISPLAY_ON: u8 = 0x29;
/// Tearing effect line off.
pub const SET_TEAR_OFF: u8 = 0x34;
/// Tearing effect line on.
pub const SET_TEAR_ON: u8 = 0x35;
/// Pixel format.
pub const SET_PIXEL_FORMAT: u8 = 0x3A;
/// Display brightness; one or two little-endian parameter bytes.
pub const SET_DISPLAY_BRIGHTNESS: u8 = 0x51;
/// Read back display brightness.
pub const GET_DISPLAY_BRIGHTNESS: u8 = 0x52;
/// Control display (brightness control block, dimming, backlight).
pub const WRITE_CONTROL_DISPLAY: u8 = 0x53;
/// Content adaptive brightness control.
pub const WRITE_POWER_SAVE: u8 = 0x55;
