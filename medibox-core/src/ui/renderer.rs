//! Renderer interface
//!
//! Drawing is delegated to an implementation that knows the panel. It is
//! handed a read-only [`View`] of everything it may show.

use crate::confirm::PendingConfirmation;
use crate::device::DeviceContext;
use crate::state::ScreenState;

use super::dirty::{DirtyRegions, Snapshot};
use super::DrawMode;

/// What the renderer may show this frame
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub screen: ScreenState,
    pub device: &'a DeviceContext,
    /// Request awaiting the user, on confirmation screens
    pub pending: Option<&'a PendingConfirmation>,
    /// Whole seconds left on the pending request
    pub countdown_s: Option<u32>,
}

impl View<'_> {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.device, self.countdown_s)
    }
}

/// Screen renderer
pub trait Renderer {
    /// Error type for draw operations
    type Error;

    /// Blank the whole screen
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw every element of the current screen onto a cleared panel
    fn draw_screen(&mut self, view: &View<'_>) -> Result<(), Self::Error>;

    /// Repaint only the given regions of the current screen
    fn update_regions(&mut self, view: &View<'_>, regions: DirtyRegions)
        -> Result<(), Self::Error>;
}

/// Run one draw step
pub fn render<R: Renderer>(renderer: &mut R, view: &View<'_>, mode: DrawMode) -> Result<(), R::Error> {
    match mode {
        DrawMode::Full => {
            renderer.clear()?;
            renderer.draw_screen(view)
        }
        DrawMode::Partial(regions) => renderer.update_regions(view, regions),
        DrawMode::Idle => Ok(()),
    }
}
