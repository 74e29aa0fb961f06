//! `DisplayBackend` over an `embedded-graphics` draw target

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_8X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use medibox_core::touch::Rect;
use medibox_display::{Color, DisplayBackend, DisplayError, TextSize, TextStyle};

/// Adapts any RGB565 draw target to the screen renderer
pub struct TftPanel<D> {
    target: D,
}

impl<D> TftPanel<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }
}

fn rgb(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color))
}

fn rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(i32::from(rect.x), i32::from(rect.y)),
        Size::new(u32::from(rect.w), u32::from(rect.h)),
    )
}

fn font(size: TextSize) -> &'static MonoFont<'static> {
    match size {
        TextSize::Small => &FONT_6X10,
        TextSize::Medium => &FONT_8X13,
        TextSize::Large => &FONT_10X20,
    }
}

impl<D> DisplayBackend for TftPanel<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError> {
        self.target
            .clear(rgb(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&rectangle(rect), rgb(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        rectangle(rect)
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: TextStyle) -> Result<(), DisplayError> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(DisplayError::InvalidCoordinates);
        }
        let character_style = MonoTextStyle::new(font(style.size), rgb(style.color));
        Text::with_baseline(
            text,
            Point::new(i32::from(x), i32::from(y)),
            character_style,
            Baseline::Top,
        )
        .draw(&mut self.target)
        .map(|_| ())
        .map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u16, u16) {
        let size = self.target.size();
        (
            size.width.min(u32::from(u16::MAX)) as u16,
            size.height.min(u32::from(u16::MAX)) as u16,
        )
    }
}
