//! Render surface abstraction
//!
//! The surface owns the rendered regions. The exporter only reads their
//! pixels and, for the duration of a capture, changes their display state
//! and the viewport scroll position.

use crate::error::RasterError;
use crate::raster::{RasterImage, Rgb};
use std::future::Future;

/// Whether a region takes part in layout and whether it is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    /// Participates in layout (not `display: none`)
    pub displayed: bool,
    /// Painted when displayed (not `visibility: hidden`)
    pub visible: bool,
}

impl DisplayState {
    pub const SHOWN: DisplayState = DisplayState {
        displayed: true,
        visible: true,
    };

    pub const HIDDEN: DisplayState = DisplayState {
        displayed: false,
        visible: false,
    };

    pub fn is_shown(&self) -> bool {
        self.displayed && self.visible
    }
}

/// Viewport scroll offset in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    pub const ORIGIN: ScrollPosition = ScrollPosition { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A renderer that owns exportable regions
pub trait RenderSurface: Send {
    /// Whether `region` currently exists
    fn has_region(&self, region: &str) -> bool;

    /// Current display state of `region`, `None` if it does not exist
    fn display_state(&self, region: &str) -> Option<DisplayState>;

    fn set_display_state(&mut self, region: &str, state: DisplayState);

    fn scroll_position(&self) -> ScrollPosition;

    fn set_scroll_position(&mut self, position: ScrollPosition);

    /// Capture the whole region, not just the part inside the viewport,
    /// at `scale` times its layout size, composited onto `background`.
    fn rasterize(
        &mut self,
        region: &str,
        scale: f64,
        background: Rgb,
    ) -> impl Future<Output = Result<RasterImage, RasterError>> + Send;
}
