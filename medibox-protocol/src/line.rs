//! Newline-delimited decoding for older primary controller firmware.
//!
//! Before the framed protocol, the primary board wrote one JSON object per
//! line with no length or checksum. Lines are terminated by `\n`; a `\r`
//! before it is ignored.

use heapless::Vec;

use crate::frame::RX_BUFFER_SIZE;

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// Errors from the line decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the receive buffer and was discarded
    LineTooLong,
}

/// Accumulates bytes until a line terminator
#[derive(Debug, Clone)]
pub struct LineDecoder {
    buffer: Vec<u8, RX_BUFFER_SIZE>,
    overflowed: bool,
    complete: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    /// Create an empty line decoder
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
            complete: false,
        }
    }

    /// Discard any partial line
    fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
        self.complete = false;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` at a non-empty line end. An overlong line is
    /// reported once, at its terminator, and its content is dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, LineError> {
        if self.complete {
            self.buffer.clear();
            self.complete = false;
        }

        match byte {
            LINE_END => {
                if self.overflowed {
                    self.reset();
                    return Err(LineError::LineTooLong);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                self.complete = true;
                Ok(Some(self.buffer.as_slice()))
            }
            b'\r' => Ok(None),
            _ => {
                if !self.overflowed && self.buffer.push(byte).is_err() {
                    self.overflowed = true;
                    self.buffer.clear();
                }
                Ok(None)
            }
        }
    }
}
