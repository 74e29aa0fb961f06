//! Frame encoding and decoding for the primary controller link.
//!
//! Frame format:
//! - SYNC (2 bytes): 0x7E 0x7E
//! - LENGTH (2 bytes): payload length, big-endian
//! - PAYLOAD (LENGTH bytes): one JSON object
//! - CHECKSUM (1 byte): XOR of all PAYLOAD bytes
//! - TERMINATOR (1 byte): 0x00

use heapless::Vec;

/// Frame synchronization byte (sent twice)
pub const SYNC_BYTE: u8 = 0x7E;

/// Frame terminator byte
pub const TERMINATOR: u8 = 0x00;

/// Receive buffer capacity. A frame must declare a length strictly below this.
pub const RX_BUFFER_SIZE: usize = 2048;

/// Bytes added around a payload (2 sync + 2 length + checksum + terminator)
pub const FRAME_OVERHEAD: usize = 6;

/// Errors that can occur while decoding or encoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Second sync byte missing, frame start abandoned
    SyncLost,
    /// Declared length is zero or does not fit the receive buffer
    LengthOutOfRange(u16),
    /// Received checksum does not match the payload
    ChecksumMismatch { expected: u8, received: u8 },
    /// Byte after the checksum was not the terminator
    BadTerminator(u8),
    /// Payload too large to encode
    PayloadTooLarge,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// XOR of all bytes in `payload`
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// Encode `payload` as a complete frame into `buffer`
///
/// Returns the number of bytes written.
pub fn encode_frame(payload: &[u8], buffer: &mut [u8]) -> Result<usize, FrameError> {
    if payload.is_empty() || payload.len() >= RX_BUFFER_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    let frame_len = payload.len() + FRAME_OVERHEAD;
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let length = payload.len() as u16;
    buffer[0] = SYNC_BYTE;
    buffer[1] = SYNC_BYTE;
    buffer[2..4].copy_from_slice(&length.to_be_bytes());
    buffer[4..4 + payload.len()].copy_from_slice(payload);
    buffer[4 + payload.len()] = checksum(payload);
    buffer[5 + payload.len()] = TERMINATOR;

    Ok(frame_len)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for the first sync byte
    AwaitSync1,
    /// Got one sync byte, waiting for the second
    AwaitSync2,
    /// Waiting for the length high byte
    LengthHigh,
    /// Waiting for the length low byte
    LengthLow,
    /// Reading payload bytes
    Data,
    /// Waiting for the checksum byte
    Checksum,
    /// Waiting for the terminator
    End,
}

/// Byte-at-a-time frame decoder
///
/// Never blocks; callers feed whatever bytes are available and get a payload
/// back once a complete, verified frame has been seen.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    buffer: Vec<u8, RX_BUFFER_SIZE>,
    expected_length: u16,
    running_checksum: u8,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder waiting for a frame start
    pub const fn new() -> Self {
        Self {
            state: DecodeState::AwaitSync1,
            buffer: Vec::new(),
            expected_length: 0,
            running_checksum: 0,
        }
    }

    /// Drop any partial frame and wait for the next sync pair
    fn reset(&mut self) {
        self.state = DecodeState::AwaitSync1;
        self.expected_length = 0;
        self.running_checksum = 0;
    }

    /// True while the decoder is between frames
    #[cfg(test)]
    fn is_idle(&self) -> bool {
        self.state == DecodeState::AwaitSync1
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(payload))` when the byte completes a valid frame,
    /// `Ok(None)` when more bytes are needed, or `Err` when a frame was dropped.
    /// After any error the decoder is back to waiting for `0x7E 0x7E`.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, FrameError> {
        match self.state {
            DecodeState::AwaitSync1 => {
                if byte == SYNC_BYTE {
                    self.state = DecodeState::AwaitSync2;
                }
                Ok(None)
            }
            DecodeState::AwaitSync2 => {
                if byte == SYNC_BYTE {
                    self.state = DecodeState::LengthHigh;
                    Ok(None)
                } else {
                    self.reset();
                    Err(FrameError::SyncLost)
                }
            }
            DecodeState::LengthHigh => {
                self.expected_length = u16::from(byte) << 8;
                self.state = DecodeState::LengthLow;
                Ok(None)
            }
            DecodeState::LengthLow => {
                let length = self.expected_length | u16::from(byte);
                if length == 0 || usize::from(length) >= RX_BUFFER_SIZE {
                    self.reset();
                    return Err(FrameError::LengthOutOfRange(length));
                }
                self.expected_length = length;
                self.running_checksum = 0;
                self.buffer.clear();
                self.state = DecodeState::Data;
                Ok(None)
            }
            DecodeState::Data => {
                // Length was checked against capacity, push cannot fail
                let _ = self.buffer.push(byte);
                self.running_checksum ^= byte;
                if self.buffer.len() == usize::from(self.expected_length) {
                    self.state = DecodeState::Checksum;
                }
                Ok(None)
            }
            DecodeState::Checksum => {
                if byte != self.running_checksum {
                    let expected = self.running_checksum;
                    self.reset();
                    return Err(FrameError::ChecksumMismatch {
                        expected,
                        received: byte,
                    });
                }
                self.state = DecodeState::End;
                Ok(None)
            }
            DecodeState::End => {
                self.reset();
                if byte == TERMINATOR {
                    Ok(Some(self.buffer.as_slice()))
                } else {
                    Err(FrameError::BadTerminator(byte))
                }
            }
        }
    }
}
