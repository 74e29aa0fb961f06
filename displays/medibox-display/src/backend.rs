//! Display backend trait
//!
//! Pixel-level drawing primitives the screen renderer needs from a panel.

use medibox_core::touch::Rect;

use crate::theme::Color;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Glyph size for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// 6x10 cells
    Small,
    /// 8x13 cells
    Medium,
    /// 10x20 cells
    Large,
}

impl TextSize {
    /// Character cell (width, height) in pixels
    pub const fn cell(self) -> (u16, u16) {
        match self {
            TextSize::Small => (6, 10),
            TextSize::Medium => (8, 13),
            TextSize::Large => (10, 20),
        }
    }

    /// Pixel width of `text` in this size
    pub fn width_of(self, text: &str) -> u16 {
        let chars = text.chars().count().min(usize::from(u16::MAX));
        (chars as u16).saturating_mul(self.cell().0)
    }
}

/// How to draw a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Color,
    pub size: TextSize,
}

impl TextStyle {
    pub const fn new(color: Color, size: TextSize) -> Self {
        Self { color, size }
    }
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering to a color panel.
/// Coordinates are in pixels with the origin at the top-left corner.
pub trait DisplayBackend {
    /// Fill the entire display with one color
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// Text running off the right edge is clipped by the panel.
    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: TextStyle)
        -> Result<(), DisplayError>;

    /// Pixel dimensions (width, height)
    fn dimensions(&self) -> (u16, u16);
}

impl<T: DisplayBackend + ?Sized> DisplayBackend for &mut T {
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError> {
        (**self).fill_screen(color)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        (**self).fill_rect(rect, color)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        (**self).draw_rect(rect, color)
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        (**self).draw_text(x, y, text, style)
    }

    fn dimensions(&self) -> (u16, u16) {
        (**self).dimensions()
    }
}
