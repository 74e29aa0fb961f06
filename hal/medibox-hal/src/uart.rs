//! Serial link abstraction
//!
//! The runtime drains whatever has arrived each loop iteration, so reads are
//! non-blocking. Writes are fire-and-forget from the caller's point of view.

/// Byte-oriented serial port
pub trait SerialPort {
    /// Error type for write operations
    type Error;

    /// Take one received byte, if any is waiting
    ///
    /// Must never block.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write all of `data`
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: SerialPort + ?Sized> SerialPort for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(data)
    }
}
