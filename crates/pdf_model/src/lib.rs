//! PDF Model - objects, content streams, and file writing
//!
//! A small PDF generator for image-based documents: raster images are
//! registered once as XObjects and drawn onto any number of fixed-size
//! pages, then the whole document is written with a cross-reference table.
//!
//! # Architecture
//!
//! - `objects`: PDF object model and serializer
//! - `content`: content stream operators
//! - `images`: image XObjects
//! - `document`: page geometry, Info dictionary, page objects
//! - `writer`: low-level object writer and the append-only `PdfDocument`

mod content;
mod document;
mod images;
mod objects;
mod writer;

pub use content::ContentStream;
pub use document::{
    mm_to_pt, pdf_date, DocumentInfo, ImageHandle, MediaBox, PdfPage, PdfVersion, POINTS_PER_MM,
};
pub use images::{ColorSpace, ImageXObject};
pub use objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
pub use writer::{PdfDocument, PdfError, PdfWriter, Result};
