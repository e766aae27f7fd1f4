//! Surface backed by pre-rendered bitmaps
//!
//! Each region is a bitmap rendered at scale 1. Rasterizing resamples it
//! to the requested scale and composites it onto the background. Display
//! and scroll state are tracked so callers can observe what the exporter
//! did to them.

use crate::error::RasterError;
use crate::raster::{RasterImage, Rgb};
use crate::surface::{DisplayState, RenderSurface, ScrollPosition};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

/// Largest canvas edge, in pixels
pub const MAX_CANVAS_SIDE: u32 = 32_767;
/// Largest canvas area, in pixels
pub const MAX_CANVAS_AREA: u64 = 268_435_456;

#[derive(Debug, Clone)]
struct SnapshotRegion {
    image: RgbaImage,
    display: DisplayState,
    /// Set for content whose pixels cannot be read back
    tainted: bool,
}

/// In-memory [`RenderSurface`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotSurface {
    regions: HashMap<String, SnapshotRegion>,
    scroll: ScrollPosition,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a region from an RGBA8 bitmap
    pub fn insert_region(&mut self, id: impl Into<String>, bitmap: RasterImage) -> Result<(), RasterError> {
        let image = RgbaImage::from_raw(bitmap.width(), bitmap.height(), bitmap.pixels().to_vec())
            .ok_or(RasterError::BufferSize {
                expected: bitmap.width() as usize * bitmap.height() as usize * 4,
                actual: bitmap.pixels().len(),
            })?;
        self.regions.insert(
            id.into(),
            SnapshotRegion {
                image,
                display: DisplayState::SHOWN,
                tainted: false,
            },
        );
        Ok(())
    }

    /// Add or replace a region from an image file (PNG or JPEG)
    pub fn load_region(&mut self, id: impl Into<String>, path: impl AsRef<Path>) -> Result<(), RasterError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| RasterError::Renderer(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(RasterError::Empty {
                width: image.width(),
                height: image.height(),
            });
        }
        self.regions.insert(
            id.into(),
            SnapshotRegion {
                image,
                display: DisplayState::SHOWN,
                tainted: false,
            },
        );
        Ok(())
    }

    pub fn remove_region(&mut self, id: &str) -> bool {
        self.regions.remove(id).is_some()
    }

    /// Mark a region's pixels as unreadable, so rasterizing it fails
    pub fn set_tainted(&mut self, id: &str, tainted: bool) {
        if let Some(region) = self.regions.get_mut(id) {
            region.tainted = tainted;
        }
    }
}

impl RenderSurface for SnapshotSurface {
    fn has_region(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    fn display_state(&self, region: &str) -> Option<DisplayState> {
        self.regions.get(region).map(|r| r.display)
    }

    fn set_display_state(&mut self, region: &str, state: DisplayState) {
        if let Some(r) = self.regions.get_mut(region) {
            r.display = state;
        }
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    fn set_scroll_position(&mut self, position: ScrollPosition) {
        self.scroll = position;
    }

    async fn rasterize(
        &mut self,
        region: &str,
        scale: f64,
        background: Rgb,
    ) -> Result<RasterImage, RasterError> {
        let snapshot = self
            .regions
            .get(region)
            .ok_or_else(|| RasterError::Renderer(format!("region '{}' disappeared", region)))?;

        if snapshot.tainted {
            return Err(RasterError::Tainted(format!(
                "region '{}' contains cross-origin content",
                region
            )));
        }
        if !snapshot.display.is_shown() {
            return Err(RasterError::Renderer(format!("region '{}' is not displayed", region)));
        }

        let (width, height) = canvas_size(snapshot.image.dimensions(), scale)?;

        let mut canvas = RgbaImage::from_pixel(
            width,
            height,
            Rgba([background.r, background.g, background.b, 255]),
        );
        let scaled = if (width, height) == snapshot.image.dimensions() {
            snapshot.image.clone()
        } else {
            image::imageops::resize(&snapshot.image, width, height, FilterType::Triangle)
        };
        image::imageops::overlay(&mut canvas, &scaled, 0, 0);

        RasterImage::from_rgba(width, height, canvas.into_raw())
    }
}

/// Scaled canvas size, bounded by [`MAX_CANVAS_SIDE`] and [`MAX_CANVAS_AREA`]
fn canvas_size((width, height): (u32, u32), scale: f64) -> Result<(u32, u32), RasterError> {
    let scaled = |px: u32| {
        let value = (px as f64 * scale).round();
        if value.is_finite() && (0.0..=MAX_CANVAS_SIDE as f64).contains(&value) {
            Some(value as u32)
        } else {
            None
        }
    };
    let too_large = || {
        RasterError::Renderer(format!(
            "{}x{} at scale {} exceeds the {}px canvas limit",
            width, height, scale, MAX_CANVAS_SIDE
        ))
    };

    let (w, h) = scaled(width).zip(scaled(height)).ok_or_else(too_large)?;
    if w == 0 || h == 0 {
        return Err(RasterError::Empty { width: w, height: h });
    }
    match (w as u64).checked_mul(h as u64) {
        Some(area) if area <= MAX_CANVAS_AREA => Ok((w, h)),
        _ => Err(RasterError::Renderer(format!(
            "{}x{} canvas exceeds the {} pixel area limit",
            w, h, MAX_CANVAS_AREA
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_with(width: u32, height: u32) -> SnapshotSurface {
        let mut surface = SnapshotSurface::new();
        surface
            .insert_region("invoice", RasterImage::solid(width, height, Rgb::new(0, 0, 255)).unwrap())
            .unwrap();
        surface
    }

    #[tokio::test]
    async fn test_rasterize_scales() {
        let mut surface = surface_with(30, 40);
        let bitmap = surface.rasterize("invoice", 2.0, Rgb::WHITE).await.unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (60, 80));
        assert_eq!(bitmap.pixel(59, 79), Some([0, 0, 255, 255]));
    }

    #[tokio::test]
    async fn test_transparent_content_lands_on_background() {
        let mut surface = SnapshotSurface::new();
        surface
            .insert_region("card", RasterImage::from_rgba(1, 1, vec![0, 0, 0, 0]).unwrap())
            .unwrap();
        let bitmap = surface.rasterize("card", 1.0, Rgb::WHITE).await.unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn test_tainted_region_fails() {
        let mut surface = surface_with(10, 10);
        surface.set_tainted("invoice", true);
        let result = surface.rasterize("invoice", 1.0, Rgb::WHITE).await;
        assert!(matches!(result, Err(RasterError::Tainted(_))));
    }

    #[tokio::test]
    async fn test_hidden_region_cannot_be_captured() {
        let mut surface = surface_with(10, 10);
        surface.set_display_state("invoice", DisplayState::HIDDEN);
        assert!(surface.rasterize("invoice", 1.0, Rgb::WHITE).await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_scale_is_an_error() {
        let mut surface = surface_with(2, 2);
        let result = surface.rasterize("invoice", 1e12, Rgb::WHITE).await;
        assert!(matches!(result, Err(RasterError::Renderer(_))));
    }

    #[test]
    fn test_canvas_limits() {
        assert_eq!(canvas_size((100, 50), 2.0).unwrap(), (200, 100));
        assert!(canvas_size((2, 2), 20_000.0).is_err());
        // Each edge fits but the area does not
        assert!(canvas_size((30_000, 30_000), 1.0).is_err());
        assert!(matches!(canvas_size((1, 1), 0.1), Err(RasterError::Empty { .. })));
    }

    #[test]
    fn test_display_and_scroll_tracking() {
        let mut surface = surface_with(10, 10);
        assert_eq!(surface.display_state("invoice"), Some(DisplayState::SHOWN));
        assert_eq!(surface.display_state("missing"), None);

        surface.set_scroll_position(ScrollPosition::new(0.0, 300.0));
        assert_eq!(surface.scroll_position().y, 300.0);
    }
}
