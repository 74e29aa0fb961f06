//! Medibox display link protocol
//!
//! This crate defines the serial protocol between the primary dispenser
//! controller and the touchscreen display controller.
//!
//! # Protocol Overview
//!
//! Every message is one JSON object wrapped in a frame:
//! ```text
//! ┌────────────┬────────┬──────────────┬──────────┬──────┐
//! │ SYNC       │ LENGTH │ PAYLOAD      │ CHECKSUM │ END  │
//! │ 0x7E 0x7E  │ 2B BE  │ 1–2047B JSON │ 1B XOR   │ 0x00 │
//! └────────────┴────────┴──────────────┴──────────┴──────┘
//! ```
//!
//! Older primary firmware sends bare newline-terminated JSON instead; see
//! [`line`] and [`LinkMode::Lines`].
//!
//! The payload `type` field selects the message kind. The display only
//! answers confirmations, quantity prompts and jam alerts; everything else
//! flows from the primary controller.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod frame;
pub mod line;
pub mod link;
pub mod messages;

pub use frame::{
    checksum, encode_frame, FrameDecoder, FrameError, RX_BUFFER_SIZE,
    SYNC_BYTE, TERMINATOR,
};
pub use line::{LineDecoder, LineError};
pub use link::{encode_outgoing, LinkDecoder, LinkError, LinkMode, TX_BUFFER_SIZE};
pub use messages::{
    ConfirmationKind, DispensingPhase, Incoming, MessageError, Outgoing, CONTROL_ID_LEN,
    DEFAULT_CONFIRMATION_TIMEOUT_S,
};
