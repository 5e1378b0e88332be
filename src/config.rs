//! Configuration types for image-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The reference implementation kept
//! these knobs in process-wide form state; here they are one explicit value
//! handed to the pipeline entry point, trivial to share, log, and diff
//! between runs.

use crate::error::Img2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for an image-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use img2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .recursive(true)
///     .dpi(150)
///     .title("Holiday scans")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Descend into subdirectories of a directory source. Default: false.
    ///
    /// Archive sources ignore this flag — their entries nest arbitrarily, so
    /// a staged archive is always enumerated recursively.
    pub recursive: bool,

    /// Resolution stamped on every page. Range: 72–400. Default: 100.
    ///
    /// Page dimensions are derived from each image's pixel size at this DPI,
    /// so a 1000 px-wide image at 100 DPI becomes a 10-inch-wide page. The
    /// value is a constant for the whole document; source images' own
    /// resolution metadata is never consulted.
    pub dpi: u32,

    /// Title embedded in the PDF /Info dictionary.
    ///
    /// If None, `convert_to_file` derives one from the destination file stem;
    /// plain `convert` falls back to "Images".
    pub title: Option<String>,

    /// Per-entry progress events. Default: None (no reporting).
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            dpi: 100,
            title: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("recursive", &self.recursive)
            .field("dpi", &self.dpi)
            .field("title", &self.title)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn recursive(mut self, v: bool) -> Self {
        self.config.recursive = v;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Img2PdfError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(Img2PdfError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if let Some(ref t) = c.title {
            if t.trim().is_empty() {
                return Err(Img2PdfError::InvalidConfig(
                    "Title must not be blank".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Output format for the batch export variant ([`crate::convert_images`]).
///
/// The export path performs a direct RGB conversion with no transparency
/// compositing, and each encoder runs with its format defaults — there is no
/// quality knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Baseline JPEG. (default)
    #[default]
    Jpeg,
    /// PNG, 8-bit RGB.
    Png,
}

impl ExportFormat {
    /// The file extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }

    /// The corresponding `image` crate format.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            ExportFormat::Jpeg => image::ImageFormat::Jpeg,
            ExportFormat::Png => image::ImageFormat::Png,
        }
    }
}
