//! Display timings

/// One video mode
///
/// Horizontal values are in pixels, vertical values in lines, following the
/// DRM `drm_display_mode` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayMode {
    /// Pixel clock in kHz.
    pub clock_khz: u32,
    /// Active width.
    pub hdisplay: u16,
    /// Start of horizontal sync.
    pub hsync_start: u16,
    /// End of horizontal sync.
    pub hsync_end: u16,
    /// Total line length.
    pub htotal: u16,
    /// Active height.
    pub vdisplay: u16,
    /// Start of vertical sync.
    pub vsync_start: u16,
    /// End of vertical sync.
    pub vsync_end: u16,
    /// Total frame length.
    pub vtotal: u16,
}

impl DisplayMode {
    /// Refresh rate in Hz, rounded to nearest. Zero for a degenerate mode.
    pub fn vrefresh(&self) -> u32 {
        let pixels = u64::from(self.htotal).saturating_mul(u64::from(self.vtotal));
        let clock_hz = u64::from(self.clock_khz).saturating_mul(1_000);
        let rounded = clock_hz
            .saturating_add(pixels >> 1)
            .checked_div(pixels)
            .unwrap_or(0);
        u32::try_from(rounded).unwrap_or(u32::MAX)
    }

    /// Sync positions are monotonic and the active area is non-empty.
    pub fn is_valid(&self) -> bool {
        self.clock_khz > 0
            && self.hdisplay > 0
            && self.hdisplay <= self.hsync_start
            && self.hsync_start <= self.hsync_end
            && self.hsync_end <= self.htotal
            && self.vdisplay > 0
            && self.vdisplay <= self.vsync_start
            && self.vsync_start <= self.vsync_end
            && self.vsync_end <= self.vtotal
    }

    /// Horizontal front porch.
    pub fn hfront_porch(&self) -> u16 {
        self.hsync_start.saturating_sub(self.hdisplay)
    }

    /// Vertical front porch.
    pub fn vfront_porch(&self) -> u16 {
        self.vsync_start.saturating_sub(self.vdisplay)
    }
}

impl core::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.hdisplay, self.vdisplay)
    }
}
