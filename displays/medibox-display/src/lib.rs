//! Display abstraction and screen renderer for the Medibox display controller
//!
//! This crate provides:
//! - `DisplayBackend` trait for pixel panels (fill, outline, text, dimensions)
//! - `TftRenderer`, which draws every controller screen onto a backend and
//!   implements the core `Renderer` trait
//! - The color theme
//!
//! # Architecture
//!
//! The firmware wraps its panel driver in a `DisplayBackend` and hands a
//! `TftRenderer` to the runtime. Everything above the backend is host
//! testable.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod renderer;
pub mod theme;

pub use backend::{DisplayBackend, DisplayError, TextSize, TextStyle};
pub use renderer::TftRenderer;
pub use theme::Color;
