//! XPT2046 resistive touch controller
//!
//! Reads 12-bit X, Y and pressure over SPI. The pen IRQ line goes low while
//! the panel is pressed.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use medibox_hal::{RawPoint, TouchSensor};

/// Control bytes: start bit, channel, 12-bit differential mode
mod cmd {
    pub const READ_X: u8 = 0xD0;
    pub const READ_Y: u8 = 0x90;
    pub const READ_Z1: u8 = 0xB0;
}

/// Samples averaged per reading
const SAMPLES: u32 = 4;
/// Z1 below this is a too-light press and gives noisy positions
const MIN_PRESSURE: u16 = 100;

/// XPT2046 driver
pub struct Xpt2046<SPI, CS, IRQ> {
    spi: SPI,
    cs: CS,
    irq: IRQ,
}

impl<SPI, CS, IRQ> Xpt2046<SPI, CS, IRQ>
where
    SPI: SpiBus,
    CS: OutputPin,
    IRQ: InputPin,
{
    pub fn new(spi: SPI, cs: CS, irq: IRQ) -> Self {
        Self { spi, cs, irq }
    }

    fn read_channel(&mut self, command: u8) -> Option<u16> {
        self.cs.set_low().ok()?;
        let mut buf = [command, 0, 0];
        let result = self
            .spi
            .transfer_in_place(&mut buf)
            .and_then(|_| self.spi.flush());
        self.cs.set_high().ok()?;
        result.ok()?;
        // 12-bit result, MSB first, starting one bit into the second byte
        Some((u16::from_be_bytes([buf[1], buf[2]]) >> 3) & 0x0FFF)
    }

    fn sample(&mut self) -> Option<RawPoint> {
        if self.read_channel(cmd::READ_Z1)? < MIN_PRESSURE {
            return None;
        }
        let (mut x, mut y) = (0u32, 0u32);
        for _ in 0..SAMPLES {
            x += u32::from(self.read_channel(cmd::READ_X)?);
            y += u32::from(self.read_channel(cmd::READ_Y)?);
        }
        Some(RawPoint::new((x / SAMPLES) as u16, (y / SAMPLES) as u16))
    }
}

impl<SPI, CS, IRQ> TouchSensor for Xpt2046<SPI, CS, IRQ>
where
    SPI: SpiBus,
    CS: OutputPin,
    IRQ: InputPin,
{
    fn is_touched(&mut self) -> bool {
        self.irq.is_low().unwrap_or(false)
    }

    fn read_raw(&mut self) -> Option<RawPoint> {
        let point = self.sample()?;
        // Released during the read: the tail samples are garbage
        if !self.is_touched() {
            return None;
        }
        trace!("touch raw ({}, {})", point.x, point.y);
        Some(point)
    }
}
