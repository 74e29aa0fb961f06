//! Screen driver
//!
//! Owns the current and last-drawn screen, the pending refresh signal, and
//! the value cache used for partial redraws. Each frame resolves to exactly
//! one [`DrawMode`].

pub mod dirty;
pub mod renderer;

pub use dirty::{DirtyRegions, Snapshot};
pub use renderer::{render, Renderer, View};

use crate::state::{ScreenEvent, ScreenState};

/// How much of the screen to draw this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawMode {
    /// Clear, then draw the whole screen
    Full,
    /// Repaint only these regions
    Partial(DirtyRegions),
    /// Nothing changed
    Idle,
}

/// A screen change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: ScreenState,
    pub to: ScreenState,
}

/// Screen state plus draw bookkeeping
#[derive(Debug, Clone)]
pub struct ScreenMachine {
    current: ScreenState,
    /// Screen shown by the last frame
    previous: ScreenState,
    refresh: bool,
    cache: Option<Snapshot>,
    transitions: u32,
}

impl Default for ScreenMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenMachine {
    /// Start on home with a full draw pending
    pub fn new() -> Self {
        Self {
            current: ScreenState::Home,
            previous: ScreenState::Home,
            refresh: true,
            cache: None,
            transitions: 0,
        }
    }

    pub fn current(&self) -> ScreenState {
        self.current
    }

    pub fn previous(&self) -> ScreenState {
        self.previous
    }

    /// Number of screen changes so far
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    /// Feed an event through the transition table
    pub fn apply(&mut self, event: ScreenEvent) -> Option<Transition> {
        let next = self.current.transition(event);
        if next == self.current {
            return None;
        }
        let transition = Transition {
            from: self.current,
            to: next,
        };
        self.current = next;
        self.transitions = self.transitions.wrapping_add(1);
        Some(transition)
    }

    /// Ask for a full redraw of the current screen on the next frame
    pub fn request_refresh(&mut self) {
        self.refresh = true;
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh || self.current != self.previous
    }

    /// Decide this frame's draw mode and remember what was shown
    ///
    /// Consumes the refresh signal.
    pub fn begin_frame(&mut self, snapshot: Snapshot) -> DrawMode {
        let full = self.refresh_pending();
        self.previous = self.current;
        self.refresh = false;

        let mode = match (&self.cache, full) {
            (Some(cached), false) => {
                let regions = cached.diff(&snapshot);
                if regions.any() {
                    DrawMode::Partial(regions)
                } else {
                    DrawMode::Idle
                }
            }
            _ => DrawMode::Full,
        };
        self.cache = Some(snapshot);
        mode
    }
}
