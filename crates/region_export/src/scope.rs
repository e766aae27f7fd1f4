//! Scoped capture state
//!
//! [`CaptureScope`] forces a region shown and the viewport to the origin,
//! and puts both back when it is released or dropped. Dropping covers
//! early returns, panics and cancelled futures.

use crate::surface::{DisplayState, RenderSurface, ScrollPosition};

/// State observed before the capture began
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedState {
    pub display: DisplayState,
    pub scroll: ScrollPosition,
}

/// Exclusive access to a surface prepared for capturing one region
pub struct CaptureScope<'a, S: RenderSurface> {
    surface: &'a mut S,
    region: String,
    saved: SavedState,
    restored: bool,
}

impl<'a, S: RenderSurface> CaptureScope<'a, S> {
    /// Snapshot display and scroll state, then force the region shown and
    /// scroll to the origin. Returns `None` without touching anything if
    /// the region does not exist.
    pub fn acquire(surface: &'a mut S, region: &str) -> Option<Self> {
        let display = surface.display_state(region)?;
        let scroll = surface.scroll_position();

        surface.set_display_state(region, DisplayState::SHOWN);
        surface.set_scroll_position(ScrollPosition::ORIGIN);

        Some(Self {
            surface,
            region: region.to_string(),
            saved: SavedState { display, scroll },
            restored: false,
        })
    }

    pub fn saved(&self) -> SavedState {
        self.saved
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn surface(&mut self) -> &mut S {
        &mut *self.surface
    }

    /// Put the saved state back and end the scope
    pub fn release(mut self) -> SavedState {
        self.restore();
        self.saved
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        self.surface.set_display_state(&self.region, self.saved.display);
        self.surface.set_scroll_position(self.saved.scroll);
    }
}

impl<S: RenderSurface> Drop for CaptureScope<'_, S> {
    fn drop(&mut self) {
        if !self.restored {
            tracing::warn!(region = %self.region, "capture scope dropped early, restoring state");
            self.restore();
        }
    }
}
