//! Export options
//!
//! Every field has a default, so a partial (or empty) JSON object is a
//! valid configuration. Unknown fields are ignored.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the captured bitmap is laid out across pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PaginationMode {
    /// Draw the full bitmap on every page, shifted up by one printable
    /// height per page, and let the page edge crop it.
    #[default]
    ShiftedOffset,
    /// Cut the bitmap into one sub-image per page and place each at the
    /// top margin.
    Sliced,
}

/// Common paper sizes, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// (width, height) in millimetres, portrait
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
        }
    }
}

/// Options for a single region export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Page width in millimetres
    #[serde(default = "default_page_width_mm")]
    pub page_width_mm: f64,
    /// Page height in millimetres
    #[serde(default = "default_page_height_mm")]
    pub page_height_mm: f64,
    /// Margin on every side, in millimetres
    #[serde(default = "default_margin_mm")]
    pub margin_mm: f64,
    /// Rasterization density multiplier, at least 1
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Wait before capture so display changes reach the rendered output
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default)]
    pub pagination: PaginationMode,
    /// Flate-compress image and content streams
    #[serde(default = "default_compress")]
    pub compress: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

fn default_page_width_mm() -> f64 {
    210.0
}

fn default_page_height_mm() -> f64 {
    297.0
}

fn default_margin_mm() -> f64 {
    10.0
}

fn default_scale() -> f64 {
    2.0
}

fn default_settle_delay_ms() -> u64 {
    100
}

fn default_compress() -> bool {
    true
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_width_mm: default_page_width_mm(),
            page_height_mm: default_page_height_mm(),
            margin_mm: default_margin_mm(),
            scale: default_scale(),
            settle_delay_ms: default_settle_delay_ms(),
            pagination: PaginationMode::default(),
            compress: default_compress(),
            title: None,
            author: None,
            subject: None,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON, falling back to defaults for omitted fields
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ExportError::InvalidOptions(e.to_string()))
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        let (width, height) = size.dimensions_mm();
        self.page_width_mm = width;
        self.page_height_mm = height;
        self
    }

    pub fn with_page_dimensions(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.page_width_mm = width_mm;
        self.page_height_mm = height_mm;
        self
    }

    pub fn with_margin(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_pagination(mut self, mode: PaginationMode) -> Self {
        self.pagination = mode;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Check that the options describe a usable page layout
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ExportError::InvalidOptions(msg));

        if !(self.page_width_mm.is_finite() && self.page_width_mm > 0.0) {
            return invalid(format!("page width must be positive, got {}", self.page_width_mm));
        }
        if !(self.page_height_mm.is_finite() && self.page_height_mm > 0.0) {
            return invalid(format!("page height must be positive, got {}", self.page_height_mm));
        }
        if !(self.margin_mm.is_finite() && self.margin_mm >= 0.0) {
            return invalid(format!("margin must not be negative, got {}", self.margin_mm));
        }
        if 2.0 * self.margin_mm >= self.page_width_mm || 2.0 * self.margin_mm >= self.page_height_mm {
            return invalid(format!(
                "margin {}mm leaves no printable area on a {}x{}mm page",
                self.margin_mm, self.page_width_mm, self.page_height_mm
            ));
        }
        if !(self.scale.is_finite() && self.scale >= 1.0) {
            return invalid(format!("scale must be at least 1, got {}", self.scale));
        }
        Ok(())
    }
}
