//! Link-level decoding and encoding
//!
//! The primary controller speaks either the framed protocol or, on older
//! firmware, newline-delimited JSON. `LinkDecoder` hides which one is in use
//! so the receive loop only deals in payloads.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::frame::{encode_frame, FrameDecoder, FrameError, FRAME_OVERHEAD};
use crate::line::{LineDecoder, LineError, LINE_END};
use crate::messages::{MessageError, Outgoing};

/// Capacity of one encoded outgoing message, framing included
pub const TX_BUFFER_SIZE: usize = 256;

/// Wire format used on the serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// `0x7E 0x7E` framed payloads with length and checksum
    #[default]
    Framed,
    /// One JSON object per `\n`-terminated line
    Lines,
}

/// Errors reported while receiving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    Frame(FrameError),
    Line(LineError),
}

impl From<FrameError> for LinkError {
    fn from(err: FrameError) -> Self {
        LinkError::Frame(err)
    }
}

impl From<LineError> for LinkError {
    fn from(err: LineError) -> Self {
        LinkError::Line(err)
    }
}

impl LinkError {
    /// Sync loss is routine on a noisy line and only worth a trace
    pub fn is_noise(&self) -> bool {
        matches!(self, LinkError::Frame(FrameError::SyncLost))
    }
}

/// Receive-side decoder for either link mode
#[derive(Debug, Clone)]
pub enum LinkDecoder {
    Framed(FrameDecoder),
    Lines(LineDecoder),
}

impl LinkDecoder {
    pub const fn new(mode: LinkMode) -> Self {
        match mode {
            LinkMode::Framed => LinkDecoder::Framed(FrameDecoder::new()),
            LinkMode::Lines => LinkDecoder::Lines(LineDecoder::new()),
        }
    }

    /// Feed a single byte, returning a payload when one completes
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, LinkError> {
        match self {
            LinkDecoder::Framed(decoder) => Ok(decoder.feed(byte)?),
            LinkDecoder::Lines(decoder) => Ok(decoder.feed(byte)?),
        }
    }
}

/// Serialize `message` and wrap it for the given link mode
pub fn encode_outgoing(
    message: &Outgoing,
    mode: LinkMode,
) -> Result<Vec<u8, TX_BUFFER_SIZE>, MessageError> {
    let json = message.to_json()?;
    let mut out = Vec::new();

    match mode {
        LinkMode::Framed => {
            out.resize(json.len() + FRAME_OVERHEAD, 0)
                .map_err(|_| FrameError::BufferTooSmall)?;
            let len = encode_frame(&json, &mut out)?;
            out.truncate(len);
        }
        LinkMode::Lines => {
            out.extend_from_slice(&json)
                .map_err(|_| FrameError::BufferTooSmall)?;
            out.push(LINE_END).map_err(|_| FrameError::BufferTooSmall)?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{checksum, SYNC_BYTE, TERMINATOR};
    use crate::messages::{ConfirmationKind, Incoming};

    #[test]
    fn test_encode_framed_jam_cleared() {
        let msg = Outgoing::JamCleared { container_number: 3 };
        let bytes = encode_outgoing(&msg, LinkMode::Framed).unwrap();
        let json = br#"{"type":"jam_cleared","container_number":3}"#;

        assert_eq!(&bytes[..2], &[SYNC_BYTE, SYNC_BYTE]);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]) as usize, json.len());
        assert_eq!(&bytes[4..4 + json.len()], json);
        assert_eq!(bytes[4 + json.len()], checksum(json));
        assert_eq!(bytes[bytes.len() - 1], TERMINATOR);
    }

    #[test]
    fn test_encode_lines_appends_newline() {
        let msg = Outgoing::QuantityConfirmed {
            confirmed: true,
            one_more: None,
        };
        let bytes = encode_outgoing(&msg, LinkMode::Lines).unwrap();
        assert_eq!(
            bytes.as_slice(),
            b"{\"type\":\"quantity_confirmed\",\"confirmed\":true}\n"
        );
    }

    #[test]
    fn test_framed_decoder_reads_own_output() {
        let msg = Outgoing::ConfirmationResponse {
            confirmed: true,
            timeout: None,
            confirmation_type: ConfirmationKind::Medication,
            control_id: None,
        };
        let bytes = encode_outgoing(&msg, LinkMode::Framed).unwrap();

        let mut decoder = LinkDecoder::new(LinkMode::Framed);
        let mut seen = 0;
        for &byte in bytes.iter() {
            if let Some(payload) = decoder.feed(byte).unwrap() {
                assert_eq!(payload, msg.to_json().unwrap().as_slice());
                seen += 1;
            }
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_lines_decoder_feeds_parser() {
        let mut decoder = LinkDecoder::new(LinkMode::Lines);

        let mut parsed = None;
        for &byte in b"{\"type\":\"current_time\",\"time\":\"09:15\"}\r\n" {
            if let Some(payload) = decoder.feed(byte).unwrap() {
                parsed = Some(Incoming::parse(payload).unwrap());
            }
        }
        assert_eq!(parsed.unwrap().kind(), "current_time");
    }

    #[test]
    fn test_sync_loss_is_noise() {
        let mut decoder = LinkDecoder::new(LinkMode::Framed);
        decoder.feed(SYNC_BYTE).unwrap();
        let err = decoder.feed(b'x').unwrap_err();
        assert!(err.is_noise());
        assert!(!LinkError::Frame(FrameError::BadTerminator(1)).is_noise());
    }
}
