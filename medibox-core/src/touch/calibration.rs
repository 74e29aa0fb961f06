//! Raw touch to screen coordinate mapping

use medibox_hal::RawPoint;

use crate::config::{ScreenGeometry, TouchCalibration};

/// A position on screen, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl TouchCalibration {
    /// Map a raw sample onto the screen, clamped to its bounds
    pub fn map(&self, raw: RawPoint, screen: ScreenGeometry) -> Point {
        Point {
            x: map_axis(raw.x, self.raw_left, self.raw_right, screen.width),
            y: map_axis(raw.y, self.raw_top, self.raw_bottom, screen.height),
        }
    }
}

/// Linear map of `raw` from `[raw_start, raw_end]` onto `[0, span)`
///
/// Either direction works; `raw_start` may be above `raw_end`.
fn map_axis(raw: u16, raw_start: u16, raw_end: u16, span: u16) -> u16 {
    if raw_start == raw_end || span == 0 {
        return 0;
    }
    let offset = i32::from(raw) - i32::from(raw_start);
    let range = i32::from(raw_end) - i32::from(raw_start);
    let scaled = offset * i32::from(span) / range;
    scaled.clamp(0, i32::from(span) - 1) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenGeometry = ScreenGeometry::DEFAULT;

    #[test]
    fn test_inverted_axes() {
        let cal = TouchCalibration::DEFAULT;
        assert_eq!(cal.map(RawPoint::new(3800, 3800), SCREEN), Point::new(0, 0));
        assert_eq!(cal.map(RawPoint::new(2000, 2000), SCREEN), Point::new(160, 120));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let cal = TouchCalibration::DEFAULT;
        assert_eq!(cal.map(RawPoint::new(4095, 4095), SCREEN), Point::new(0, 0));
        assert_eq!(cal.map(RawPoint::new(0, 0), SCREEN), Point::new(319, 239));
        assert_eq!(cal.map(RawPoint::new(200, 200), SCREEN), Point::new(319, 239));
    }

    #[test]
    fn test_normal_orientation() {
        let cal = TouchCalibration {
            raw_left: 200,
            raw_right: 3800,
            raw_top: 200,
            raw_bottom: 3800,
        };
        assert_eq!(cal.map(RawPoint::new(200, 3800), SCREEN), Point::new(0, 239));
    }

    #[test]
    fn test_degenerate_calibration() {
        let cal = TouchCalibration {
            raw_left: 1000,
            raw_right: 1000,
            raw_top: 1000,
            raw_bottom: 1000,
        };
        assert_eq!(cal.map(RawPoint::new(1500, 10), SCREEN), Point::new(0, 0));
    }
}
