//! Image XObjects
//!
//! Raster images are embedded as 8-bit DeviceRGB sample streams. The writer
//! applies FlateDecode when compression is enabled, so samples are kept
//! uncompressed here.

use crate::objects::{PdfDictionary, PdfObject, PdfStream};
use crate::writer::{PdfError, Result};

/// Color space of the image samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
        }
    }
}

/// Image samples ready to be written as an XObject
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    samples: Vec<u8>,
}

impl ImageXObject {
    /// Wrap packed 8-bit RGB samples, row-major from the top-left pixel.
    pub fn from_rgb(samples: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        Self::new(samples, width, height, ColorSpace::DeviceRGB)
    }

    /// Wrap packed 8-bit grayscale samples.
    pub fn from_gray(samples: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        Self::new(samples, width, height, ColorSpace::DeviceGray)
    }

    fn new(samples: Vec<u8>, width: u32, height: u32, color_space: ColorSpace) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "image has zero size ({}x{})",
                width, height
            )));
        }

        let expected = width as usize * height as usize * color_space.components();
        if samples.len() != expected {
            return Err(PdfError::InvalidImage(format!(
                "expected {} bytes of {} samples for {}x{}, got {}",
                expected,
                color_space.pdf_name(),
                width,
                height,
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            color_space,
            samples,
        })
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Build the XObject stream
    pub fn into_stream(self) -> PdfStream {
        let mut dict = PdfDictionary::typed("XObject");
        dict.insert("Subtype", PdfObject::name("Image"));
        dict.insert("Width", self.width);
        dict.insert("Height", self.height);
        dict.insert("BitsPerComponent", 8i64);
        dict.insert("ColorSpace", PdfObject::name(self.color_space.pdf_name()));

        PdfStream::new(self.samples).with_dict(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_image() {
        let image = ImageXObject::from_rgb(vec![255u8; 3 * 10 * 4], 10, 4).unwrap();
        assert_eq!(image.width, 10);
        assert_eq!(image.height, 4);
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
    }

    #[test]
    fn test_sample_length_mismatch() {
        let result = ImageXObject::from_rgb(vec![0u8; 10], 2, 2);
        assert!(matches!(result, Err(PdfError::InvalidImage(_))));
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = ImageXObject::from_gray(Vec::new(), 0, 5);
        assert!(matches!(result, Err(PdfError::InvalidImage(_))));
    }

    #[test]
    fn test_xobject_dictionary() {
        let stream = ImageXObject::from_gray(vec![128u8; 6], 3, 2)
            .unwrap()
            .into_stream();

        assert_eq!(stream.dict.get("Subtype"), Some(&PdfObject::name("Image")));
        assert_eq!(stream.dict.get("Width"), Some(&PdfObject::Integer(3)));
        assert_eq!(stream.dict.get("ColorSpace"), Some(&PdfObject::name("DeviceGray")));
        assert_eq!(stream.len(), 6);
    }
}
