//! Region exporter
//!
//! Captures a rendered region and saves it as a paginated PDF:
//!
//! 1. Force the region shown and scroll the viewport to the origin
//! 2. Wait one bounded render-settling tick
//! 3. Rasterize the full region at `scale` onto white
//! 4. Restore display and scroll state, on every exit path
//! 5. Fit the bitmap to the printable width and count pages
//! 6. Place the bitmap on each page and encode the PDF
//! 7. Hand the document to the sink

use crate::error::{ExportError, Result};
use crate::geometry::PageGeometry;
use crate::options::ExportOptions;
use crate::paginate::render_document;
use crate::raster::{RasterImage, Rgb};
use crate::scope::CaptureScope;
use crate::sink::{DocumentSink, ExportedDocument};
use crate::stage::{ExportStage, StageTracker};
use crate::surface::RenderSurface;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub filename: String,
    pub geometry: PageGeometry,
    pub bytes_written: usize,
}

impl ExportReport {
    pub fn page_count(&self) -> usize {
        self.geometry.page_count
    }
}

/// Exports regions of a render surface to a document sink
///
/// The surface sits behind an async mutex held from the region lookup
/// until its state is restored, so overlapping calls queue up and never
/// interleave their capture and restore steps on the shared display and
/// scroll state. Pagination and saving run after the lock is released.
pub struct DocumentExporter<S, K> {
    surface: Mutex<S>,
    sink: K,
}

impl<S, K> DocumentExporter<S, K>
where
    S: RenderSurface,
    K: DocumentSink,
{
    pub fn new(surface: S, sink: K) -> Self {
        Self {
            surface: Mutex::new(surface),
            sink,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Run `f` with exclusive access to the surface, waiting for any
    /// in-flight export to finish first
    pub async fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut surface = self.surface.lock().await;
        f(&mut surface)
    }

    pub fn into_parts(self) -> (S, K) {
        (self.surface.into_inner(), self.sink)
    }

    /// Export `region` as a paginated PDF saved under `filename`
    #[instrument(skip(self, options), fields(scale = options.scale))]
    pub async fn export_region(
        &self,
        region: &str,
        filename: &str,
        options: &ExportOptions,
    ) -> Result<ExportReport> {
        let mut stages = StageTracker::new(region);
        let result = self.run(region, filename, options, &mut stages).await;

        match &result {
            Ok(report) => info!(
                pages = report.page_count(),
                bytes = report.bytes_written,
                "export finished"
            ),
            Err(e) => {
                warn!(stage = %stages.current(), error = %e, "export failed");
                stages.fail();
            }
        }
        result
    }

    async fn run(
        &self,
        region: &str,
        filename: &str,
        options: &ExportOptions,
        stages: &mut StageTracker,
    ) -> Result<ExportReport> {
        if filename.trim().is_empty() {
            return Err(ExportError::InvalidOptions("filename must not be empty".to_string()));
        }
        options.validate()?;

        let mut surface = self.surface.lock().await;
        if !surface.has_region(region) {
            return Err(ExportError::TargetNotFound(region.to_string()));
        }

        stages.advance(ExportStage::Capturing);
        let captured = capture(&mut *surface, region, options).await;
        stages.advance(ExportStage::Restoring);
        drop(surface);
        let bitmap = captured?;

        stages.advance(ExportStage::Paginating);
        let geometry = PageGeometry::compute(bitmap.width(), bitmap.height(), options)?;
        debug!(
            bitmap_width = bitmap.width(),
            bitmap_height = bitmap.height(),
            image_height_mm = geometry.image_height_mm,
            pages = geometry.page_count,
            "page geometry"
        );
        let bytes = render_document(&bitmap, &geometry, options)?;
        drop(bitmap);

        let bytes_written = bytes.len();
        let document = ExportedDocument {
            filename: filename.to_string(),
            bytes,
            page_count: geometry.page_count,
        };
        self.sink
            .save(document)
            .await
            .map_err(|source| ExportError::SaveFailed {
                filename: filename.to_string(),
                source,
            })?;
        stages.advance(ExportStage::Saved);

        Ok(ExportReport {
            filename: filename.to_string(),
            geometry,
            bytes_written,
        })
    }
}

/// Steps 1-4: the capture scope restores state when it goes out of scope,
/// whether rasterization succeeded or not.
async fn capture<S: RenderSurface>(
    surface: &mut S,
    region: &str,
    options: &ExportOptions,
) -> Result<RasterImage> {
    let mut scope = CaptureScope::acquire(surface, region)
        .ok_or_else(|| ExportError::TargetNotFound(region.to_string()))?;

    tokio::time::sleep(options.settle_delay()).await;

    let raster = scope
        .surface()
        .rasterize(region, options.scale, Rgb::WHITE)
        .await;
    let saved = scope.release();
    debug!(region, restored = ?saved, "capture state restored");

    raster.map_err(|source| ExportError::RasterizationFailed {
        region: region.to_string(),
        source,
    })
}
