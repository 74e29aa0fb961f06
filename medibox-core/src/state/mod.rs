//! Screen state machine
//!
//! The current screen decides what is drawn and which touch regions are
//! live. Transitions are explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::ScreenEvent;
pub use machine::ScreenState;
