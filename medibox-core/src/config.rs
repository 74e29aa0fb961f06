//! Configuration types
//!
//! Board-agnostic settings for the display controller. The firmware builds a
//! `DisplayConfig` at compile time from `display.toml`; tests use
//! [`DisplayConfig::DEFAULT`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use medibox_protocol::{LinkMode, DEFAULT_CONFIRMATION_TIMEOUT_S};

/// Screen size in pixels, landscape orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenGeometry {
    pub width: u16,
    pub height: u16,
}

impl ScreenGeometry {
    pub const DEFAULT: Self = Self {
        width: 320,
        height: 240,
    };
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Raw ADC readings at the screen edges
///
/// The panel on the reference board is mounted so that raw values fall as
/// screen coordinates rise; `raw_left > raw_right` is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchCalibration {
    /// Raw X at screen x = 0
    pub raw_left: u16,
    /// Raw X at screen x = width
    pub raw_right: u16,
    /// Raw Y at screen y = 0
    pub raw_top: u16,
    /// Raw Y at screen y = height
    pub raw_bottom: u16,
}

impl TouchCalibration {
    pub const DEFAULT: Self = Self {
        raw_left: 3800,
        raw_right: 200,
        raw_top: 3800,
        raw_bottom: 200,
    };
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Main loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Sleep between loop iterations
    pub loop_interval_ms: u32,
    /// Pause after a touch that triggered an action
    pub debounce_ms: u32,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        loop_interval_ms: 20,
        debounce_ms: 200,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    pub mode: LinkMode,
    pub baudrate: u32,
}

impl LinkConfig {
    pub const DEFAULT: Self = Self {
        mode: LinkMode::Framed,
        baudrate: 115_200,
    };
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete display controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub screen: ScreenGeometry,
    pub touch: TouchCalibration,
    pub timing: Timing,
    pub link: LinkConfig,
    /// Used when a confirmation request carries no `timeout_seconds`
    pub default_confirmation_timeout_s: u32,
}

impl DisplayConfig {
    pub const DEFAULT: Self = Self {
        screen: ScreenGeometry::DEFAULT,
        touch: TouchCalibration::DEFAULT,
        timing: Timing::DEFAULT,
        link: LinkConfig::DEFAULT,
        default_confirmation_timeout_s: DEFAULT_CONFIRMATION_TIMEOUT_S,
    };
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_board() {
        let config = DisplayConfig::default();
        assert_eq!(config.screen.width, 320);
        assert_eq!(config.screen.height, 240);
        assert_eq!(config.timing.debounce_ms, 200);
        assert_eq!(config.link.mode, LinkMode::Framed);
        assert_eq!(config.default_confirmation_timeout_s, 60);
        assert!(config.touch.raw_left > config.touch.raw_right);
    }
}
