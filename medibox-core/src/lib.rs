//! Board-agnostic logic for the Medibox display controller
//!
//! This crate contains everything between the serial bytes and the pixels
//! that does not depend on specific hardware:
//!
//! - Device context mirrored from the primary controller
//! - Message dispatch
//! - Confirmation slot with timeout
//! - Screen state machine and dirty-region tracking
//! - Touch calibration and hit testing
//! - The cooperative runtime tick tying it together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod config;
pub mod confirm;
pub mod controller;
pub mod device;
pub mod dispatch;
pub mod runtime;
pub mod state;
pub mod text;
pub mod touch;
pub mod ui;

pub use config::DisplayConfig;
pub use controller::Controller;
pub use runtime::{Runtime, SendError, TickReport};
