//! ILI9341 TFT driver
//!
//! Driver for 320x240 ILI9341 panels on a blocking SPI bus with manual
//! chip-select, data/command and reset lines. Exposes the panel as an
//! `embedded-graphics` draw target in landscape orientation.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Display dimensions in landscape
pub const WIDTH: u16 = 320;
pub const HEIGHT: u16 = 240;

/// Pixels sent per SPI write when filling
const FILL_CHUNK: usize = 64;

/// ILI9341 commands
#[allow(dead_code)]
mod cmd {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const PIXFMT: u8 = 0x3A;
}

/// Row/column exchange with BGR order: landscape, 320 wide
const MADCTL_LANDSCAPE: u8 = 0x28;
/// 16 bits per pixel
const PIXFMT_RGB565: u8 = 0x55;

/// Bus or pin failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    Spi,
    Pin,
}

/// ILI9341 driver
pub struct Ili9341<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
}

impl<SPI, CS, DC, RST> Ili9341<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        Self { spi, cs, dc, rst }
    }

    /// Reset and configure the panel
    ///
    /// Blocks for roughly half a second.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError> {
        self.cs.set_high().map_err(|_| PanelError::Pin)?;
        self.rst.set_low().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);
        self.command(cmd::PIXFMT, &[PIXFMT_RGB565])?;
        self.command(cmd::MADCTL, &[MADCTL_LANDSCAPE])?;
        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(20);
        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), PanelError> {
        self.cs.set_low().map_err(|_| PanelError::Pin)?;
        let result = self.command_selected(command, params);
        self.cs.set_high().map_err(|_| PanelError::Pin)?;
        result
    }

    fn command_selected(&mut self, command: u8, params: &[u8]) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[command]).map_err(|_| PanelError::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| PanelError::Pin)?;
            self.spi.write(params).map_err(|_| PanelError::Spi)?;
        }
        self.spi.flush().map_err(|_| PanelError::Spi)
    }

    /// Fill an inclusive window with one raw RGB565 color
    fn fill_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, color: u16) -> Result<(), PanelError> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::PASET, &[y0h, y0l, y1h, y1l])?;

        let pixels = u32::from(x1 - x0 + 1) * u32::from(y1 - y0 + 1);
        self.cs.set_low().map_err(|_| PanelError::Pin)?;
        let result = self.stream_fill(pixels, color);
        self.cs.set_high().map_err(|_| PanelError::Pin)?;
        result
    }

    /// Write `pixels` copies of `color` into the current window
    fn stream_fill(&mut self, pixels: u32, color: u16) -> Result<(), PanelError> {
        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }

        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[cmd::RAMWR]).map_err(|_| PanelError::Spi)?;
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        let mut remaining = pixels;
        while remaining > 0 {
            let count = remaining.min(FILL_CHUNK as u32) as usize;
            self.spi.write(&chunk[..count * 2]).map_err(|_| PanelError::Spi)?;
            remaining -= count as u32;
        }
        self.spi.flush().map_err(|_| PanelError::Spi)
    }
}

impl<SPI, CS, DC, RST> OriginDimensions for Ili9341<SPI, CS, DC, RST> {
    fn size(&self) -> Size {
        Size::new(u32::from(WIDTH), u32::from(HEIGHT))
    }
}

impl<SPI, CS, DC, RST> DrawTarget for Ili9341<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = PanelError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= u32::from(WIDTH) || y >= u32::from(HEIGHT) {
                continue;
            }
            let (x, y) = (x as u16, y as u16);
            self.fill_window(x, y, x, y, color.into_storage())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        // Clipped to the panel, so all corners are in range
        self.fill_window(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
            color.into_storage(),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_window(0, 0, WIDTH - 1, HEIGHT - 1, color.into_storage())
    }
}
