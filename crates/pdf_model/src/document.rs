//! Document structure
//!
//! Page geometry, the Info dictionary, and the page objects that make up
//! an append-only multi-page document.

use crate::content::ContentStream;
use crate::objects::{PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Points per millimetre (72 pt per inch, 25.4 mm per inch)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to PDF points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// PDF version written in the file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfVersion {
    #[default]
    V1_4,
    V1_7,
}

impl PdfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_7 => "1.7",
        }
    }
}

/// Document information dictionary
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            creator: None,
            producer: Some(concat!("pdf_model ", env!("CARGO_PKG_VERSION")).to_string()),
            creation_date: None,
        }
    }
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the creation date with the current time
    pub fn created_now(mut self) -> Self {
        self.creation_date = Some(Utc::now());
        self
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let text_fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                dict.insert(key, PdfObject::string(value.as_bytes()));
            }
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::string(pdf_date(&date)));
        }
        dict
    }
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSS+00'00'`)
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// Page dimensions in points, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn from_points(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_mm(width_mm: f64, height_mm: f64) -> Self {
        Self::from_points(mm_to_pt(width_mm), mm_to_pt(height_mm))
    }

    pub fn to_array(&self) -> PdfObject {
        PdfObject::rect(0.0, 0.0, self.width, self.height)
    }
}

/// Handle to an image registered with a [`crate::PdfDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageHandle(pub(crate) usize);

impl ImageHandle {
    /// Resource name used in content streams
    pub fn resource_name(&self) -> String {
        format!("Im{}", self.0)
    }
}

/// A single page under construction
///
/// Placement coordinates are in points measured from the page's top-left
/// corner, matching screen layout. They are flipped to PDF's bottom-up
/// space when drawn.
#[derive(Debug)]
pub struct PdfPage {
    pub media_box: MediaBox,
    content: ContentStream,
    images: BTreeSet<ImageHandle>,
}

impl PdfPage {
    pub fn new(media_box: MediaBox) -> Self {
        Self {
            media_box,
            content: ContentStream::new(),
            images: BTreeSet::new(),
        }
    }

    /// Paint the whole page with an opaque RGB color
    pub fn fill_background(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.content
            .save_state()
            .set_fill_rgb(r, g, b)
            .rect(0.0, 0.0, self.media_box.width, self.media_box.height)
            .fill()
            .restore_state();
        self
    }

    /// Draw an image with its top-left corner at `(x, top)`.
    ///
    /// `top` may be negative or exceed the page height; whatever falls
    /// outside the media box is cropped by the page edge.
    pub fn draw_image(&mut self, image: ImageHandle, x: f64, top: f64, width: f64, height: f64) -> &mut Self {
        let y = self.media_box.height - top - height;
        self.content
            .place_image(&image.resource_name(), x, y, width, height);
        self.images.insert(image);
        self
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageHandle> {
        self.images.iter()
    }

    pub fn content(&self) -> &ContentStream {
        &self.content
    }

    pub(crate) fn into_parts(self) -> (MediaBox, ContentStream, BTreeSet<ImageHandle>) {
        (self.media_box, self.content, self.images)
    }
}

/// Build the catalog dictionary
pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    let mut dict = PdfDictionary::typed("Catalog");
    dict.insert("Pages", PdfObject::Reference(pages_ref));
    dict
}

/// Build the page tree root
pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    let mut dict = PdfDictionary::typed("Pages");
    dict.insert("Kids", PdfObject::references(page_refs));
    dict.insert("Count", page_refs.len() as i64);
    dict
}
