//! Hit regions shared by the touch router and the renderer
//!
//! Coordinates assume the 320x240 landscape screen. Regions on one screen
//! never overlap.

use super::calibration::Point;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open hit test: `x ∈ [x, x+w)`, `y ∈ [y, y+h)`
    pub fn contains(&self, point: Point) -> bool {
        let px = u32::from(point.x);
        let py = u32::from(point.y);
        let (x, y) = (u32::from(self.x), u32::from(self.y));
        px >= x && px < x + u32::from(self.w) && py >= y && py < y + u32::from(self.h)
    }

    pub const fn right(&self) -> u16 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> u16 {
        self.y + self.h
    }
}

/// Top status bar: time, connectivity, sensors
pub const STATUS_BAR: Rect = Rect::new(0, 0, 320, 30);
/// Main content area between status bar and buttons
pub const CONTENT: Rect = Rect::new(0, 30, 320, 120);
/// Banner line above the home buttons
pub const BANNER: Rect = Rect::new(0, 150, 320, 24);

// Home
pub const HOME_REMINDERS: Rect = Rect::new(10, 180, 95, 50);
pub const HOME_CONTAINERS: Rect = Rect::new(115, 180, 95, 50);
pub const HOME_SCHEDULE: Rect = Rect::new(220, 180, 90, 50);

// List screens
pub const LIST_BACK: Rect = Rect::new(10, 190, 80, 40);

/// Single centred action button (alarm dismiss, jam continue)
pub const WIDE_BUTTON: Rect = Rect::new(85, 170, 150, 50);
/// Small centred OK button (dispensing done, Wi-Fi error)
pub const OK_BUTTON: Rect = Rect::new(110, 180, 100, 45);

/// Left button of a two-button prompt (confirm, yes)
pub const LEFT_BUTTON: Rect = Rect::new(20, 170, 130, 50);
/// Right button of a two-button prompt (cancel, one more)
pub const RIGHT_BUTTON: Rect = Rect::new(170, 170, 130, 50);

/// Countdown readout on confirmation screens
pub const COUNTDOWN: Rect = Rect::new(240, 36, 72, 24);
/// Progress line on the dispensing screen
pub const PROGRESS: Rect = Rect::new(20, 120, 280, 24);
