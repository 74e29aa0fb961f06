//! Medibox Hardware Abstraction Layer
//!
//! Traits for the three peripherals the display controller logic touches.
//! The firmware implements them on top of Embassy drivers; tests implement
//! them with in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  medibox-core (runtime, dispatch, UI)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  medibox-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  medibox-     │       │  host test    │
//! │  firmware     │       │  fakes        │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialPort`] - Link to the primary controller
//! - [`touch::TouchSensor`] - Resistive touch panel
//! - [`time::Clock`] - Monotonic millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod time;
pub mod touch;
pub mod uart;

pub use time::Clock;
pub use touch::{RawPoint, TouchSensor};
pub use uart::SerialPort;
