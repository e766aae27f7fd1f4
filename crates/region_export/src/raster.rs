//! Captured bitmaps

use crate::error::RasterError;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// RGBA8 bitmap, row-major from the top-left pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer, checking it matches the dimensions
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A bitmap filled with one opaque color
    pub fn solid(width: u32, height: u32, color: Rgb) -> Result<Self, RasterError> {
        let pixels = [color.r, color.g, color.b, 255]
            .repeat(width as usize * height as usize);
        Self::from_rgba(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Composite onto an opaque background and drop the alpha channel.
    ///
    /// Transparent pixels come out as `background` instead of black.
    pub fn flatten_rgb(&self, background: Rgb) -> Vec<u8> {
        let bg = [background.r, background.g, background.b];
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.pixels.chunks_exact(4) {
            let alpha = px[3] as u32;
            for c in 0..3 {
                let blended = (px[c] as u32 * alpha + bg[c] as u32 * (255 - alpha) + 127) / 255;
                out.push(blended as u8);
            }
        }
        out
    }

    /// Copy rows `[start, end)` into a new bitmap
    pub fn crop_rows(&self, start: u32, end: u32) -> Result<Self, RasterError> {
        let end = end.min(self.height);
        if start >= end {
            return Err(RasterError::Empty {
                width: self.width,
                height: end.saturating_sub(start),
            });
        }
        let row_bytes = self.width as usize * 4;
        let pixels = self.pixels[start as usize * row_bytes..end as usize * row_bytes].to_vec();
        Self::from_rgba(self.width, end - start, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_checked() {
        let result = RasterImage::from_rgba(2, 2, vec![0; 15]);
        assert!(matches!(
            result,
            Err(RasterError::BufferSize { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_empty_rejected() {
        let result = RasterImage::from_rgba(0, 4, Vec::new());
        assert!(matches!(result, Err(RasterError::Empty { .. })));
    }

    #[test]
    fn test_transparent_flattens_to_white() {
        let image = RasterImage::from_rgba(1, 1, vec![0, 0, 0, 0]).unwrap();
        assert_eq!(image.flatten_rgb(Rgb::WHITE), vec![255, 255, 255]);
    }

    #[test]
    fn test_opaque_pixels_unchanged() {
        let image = RasterImage::from_rgba(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 255]).unwrap();
        assert_eq!(image.flatten_rgb(Rgb::WHITE), vec![10, 20, 30, 200, 100, 50]);
    }

    #[test]
    fn test_half_alpha_blends() {
        let image = RasterImage::from_rgba(1, 1, vec![0, 0, 0, 128]).unwrap();
        assert_eq!(image.flatten_rgb(Rgb::WHITE), vec![127, 127, 127]);
    }

    #[test]
    fn test_crop_rows() {
        let mut pixels = Vec::new();
        for row in 0..4u8 {
            pixels.extend_from_slice(&[row, row, row, 255, row, row, row, 255]);
        }
        let image = RasterImage::from_rgba(2, 4, pixels).unwrap();

        let slice = image.crop_rows(1, 3).unwrap();
        assert_eq!(slice.height(), 2);
        assert_eq!(slice.pixel(0, 0), Some([1, 1, 1, 255]));
        assert_eq!(slice.pixel(1, 1), Some([2, 2, 2, 255]));

        assert!(image.crop_rows(3, 3).is_err());
        assert_eq!(image.crop_rows(2, 99).unwrap().height(), 2);
    }

    #[test]
    fn test_solid() {
        let image = RasterImage::solid(3, 2, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(image.pixel(2, 1), Some([1, 2, 3, 255]));
        assert_eq!(image.pixel(3, 0), None);
    }
}
