//! Serial link to the primary controller over a buffered UART

use embedded_io::{ErrorType, Read, ReadReady, Write};
use medibox_hal::SerialPort;

/// Non-blocking byte reads over any `embedded_io` port
///
/// The interrupt-driven buffer fills in the background; reads only take what
/// has already arrived.
pub struct UartLink<U> {
    uart: U,
}

impl<U> UartLink<U>
where
    U: Read + ReadReady + Write,
{
    pub fn new(uart: U) -> Self {
        Self { uart }
    }
}

impl<U> SerialPort for UartLink<U>
where
    U: Read + ReadReady + Write,
{
    type Error = <U as ErrorType>::Error;

    fn read_byte(&mut self) -> Option<u8> {
        match self.uart.read_ready() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(_) => {
                warn!("uart rx error");
                return None;
            }
        }
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.write_all(data)?;
        self.uart.flush()
    }
}
