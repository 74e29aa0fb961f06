//! Touch panel abstraction

/// Raw ADC sample from the touch controller, before calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
}

impl RawPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Resistive touch sensor
pub trait TouchSensor {
    /// Whether the panel is currently pressed
    fn is_touched(&mut self) -> bool;

    /// Read the current raw position
    ///
    /// Returns `None` if the press was released mid-read or the sample is
    /// unusable.
    fn read_raw(&mut self) -> Option<RawPoint>;
}
