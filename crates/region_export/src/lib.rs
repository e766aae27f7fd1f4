//! Region Export - rendered regions to paginated PDF documents
//!
//! Captures a region owned by a [`RenderSurface`] at a chosen pixel
//! density, fits the bitmap to the printable width of a page, spreads its
//! height across as many pages as it needs, and saves the PDF through a
//! [`DocumentSink`].
//!
//! ```ignore
//! use region_export::{DirectorySink, DocumentExporter, ExportOptions, SnapshotSurface};
//!
//! let mut surface = SnapshotSurface::new();
//! surface.load_region("invoice", "invoice.png")?;
//!
//! let exporter = DocumentExporter::new(surface, DirectorySink::new("downloads"));
//! let report = exporter
//!     .export_region("invoice", "Invoice-1042.pdf", &ExportOptions::default())
//!     .await?;
//! println!("{} pages", report.page_count());
//! ```

mod error;
mod exporter;
mod geometry;
mod options;
mod paginate;
mod raster;
mod scope;
mod sink;
mod snapshot;
mod stage;
mod surface;

pub use error::*;
pub use exporter::{DocumentExporter, ExportReport};
pub use geometry::PageGeometry;
pub use options::{ExportOptions, PageSize, PaginationMode};
pub use paginate::render_document;
pub use raster::{RasterImage, Rgb};
pub use scope::{CaptureScope, SavedState};
pub use sink::{DirectorySink, DocumentSink, ExportedDocument, MemorySink};
pub use snapshot::{SnapshotSurface, MAX_CANVAS_AREA, MAX_CANVAS_SIDE};
pub use stage::ExportStage;
pub use surface::{DisplayState, RenderSurface, ScrollPosition};
