//! Error types for region export

use pdf_model::PdfError;
use thiserror::Error;

/// Failure reported by a render surface while capturing a region
#[derive(Debug, Error)]
pub enum RasterError {
    /// Pixels cannot be read back, e.g. cross-origin image content
    #[error("region content is not readable: {0}")]
    Tainted(String),

    /// The region rendered to an empty bitmap
    #[error("region rendered to an empty {width}x{height} bitmap")]
    Empty { width: u32, height: u32 },

    /// Pixel buffer does not match the reported dimensions
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Any other renderer failure
    #[error("renderer failed: {0}")]
    Renderer(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// The region identifier did not resolve when the export started
    #[error("export target not found: {0}")]
    TargetNotFound(String),

    /// Capturing the region failed
    #[error("rasterization of '{region}' failed: {source}")]
    RasterizationFailed {
        region: String,
        #[source]
        source: RasterError,
    },

    /// Encoding the bitmap or the document failed
    #[error("document encoding failed: {0}")]
    EncodingFailed(#[from] PdfError),

    /// Options or filename rejected before anything was touched
    #[error("invalid export options: {0}")]
    InvalidOptions(String),

    /// The finished document could not be persisted
    #[error("saving '{filename}' failed: {source}")]
    SaveFailed {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
