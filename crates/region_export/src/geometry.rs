//! Page geometry
//!
//! Fits a bitmap to the printable width of a page, preserving its aspect
//! ratio, and works out how many pages its height spans.

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;

/// Layout of one captured bitmap across pages, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    /// Width of the placed image (printable width)
    pub image_width_mm: f64,
    /// Height of the placed image at that width
    pub image_height_mm: f64,
    /// Printable height of one page
    pub available_height_mm: f64,
    pub page_count: usize,
    pub bitmap_width_px: u32,
    pub bitmap_height_px: u32,
}

impl PageGeometry {
    /// Compute the layout for a `width_px` x `height_px` bitmap.
    ///
    /// Options are expected to have passed [`ExportOptions::validate`].
    pub fn compute(width_px: u32, height_px: u32, options: &ExportOptions) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(ExportError::InvalidOptions(format!(
                "cannot lay out an empty {}x{} bitmap",
                width_px, height_px
            )));
        }

        let image_width_mm = options.page_width_mm - 2.0 * options.margin_mm;
        let image_height_mm = height_px as f64 * image_width_mm / width_px as f64;
        let available_height_mm = options.page_height_mm - 2.0 * options.margin_mm;
        let page_count = ((image_height_mm / available_height_mm).ceil() as usize).max(1);

        Ok(Self {
            page_width_mm: options.page_width_mm,
            page_height_mm: options.page_height_mm,
            margin_mm: options.margin_mm,
            image_width_mm,
            image_height_mm,
            available_height_mm,
            page_count,
            bitmap_width_px: width_px,
            bitmap_height_px: height_px,
        })
    }

    /// Vertical offset of the full image on page `index`, measured from
    /// the top edge. Negative once the image starts above the page.
    pub fn image_offset_mm(&self, index: usize) -> f64 {
        self.margin_mm - index as f64 * self.available_height_mm
    }

    /// Bitmap pixels per millimetre of placed image
    pub fn pixels_per_mm(&self) -> f64 {
        self.bitmap_width_px as f64 / self.image_width_mm
    }

    /// Bitmap rows `[start, end)` that fall in the printable area of page
    /// `index`. Every page gets at least one row.
    pub fn slice_rows(&self, index: usize) -> (u32, u32) {
        let rows_per_page = self.available_height_mm * self.pixels_per_mm();
        let height = self.bitmap_height_px;

        let start = ((index as f64 * rows_per_page).round() as u32).min(height - 1);
        let end = if index + 1 >= self.page_count {
            height
        } else {
            (((index + 1) as f64 * rows_per_page).round() as u32).clamp(start + 1, height)
        };
        (start, end)
    }
}
