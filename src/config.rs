//! Configuration types for news image generation.
//!
//! Generation behaviour is controlled through [`GeneratorConfig`], built via
//! its [`GeneratorConfigBuilder`]. The compositor's canvas and caption
//! constants live in [`LayoutConfig`] and are passed into composition
//! explicitly, so layout is a pure function of `(photos, title, layout)`.

use crate::error::NewsImageError;
use crate::progress::ProgressCallback;
use crate::transport::ContentFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Canvas and caption constants used by the compositor.
///
/// The defaults reproduce the standard 1920×1080 news card: a 60-character
/// caption measure, 48 px bold white text on a 75 % black band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Output width in pixels. Default: 1920.
    pub canvas_width: u32,

    /// Output height in pixels. Default: 1080.
    pub canvas_height: u32,

    /// Maximum characters per caption line before wrapping. Default: 60.
    pub chars_per_line: usize,

    /// Nominal caption line height in pixels. Default: 60.
    pub line_height: u32,

    /// Padding above and below the caption lines. Default: 40.
    pub band_padding: u32,

    /// Minimum caption band height. Default: 200.
    pub min_band_height: u32,

    /// Caption font size in pixels. Default: 48.
    pub font_size: u32,

    /// CSS font-family list for the caption. Default: "Arial, sans-serif".
    pub font_family: String,

    /// Extra directory scanned for `.ttf`/`.otf` fonts besides system fonts.
    pub font_dir: Option<PathBuf>,

    /// Opacity of the black caption band, 0.0–1.0. Default: 0.75.
    pub band_opacity: f32,

    /// Brightness multiplier for the full (three-photo) mode. Default: 0.6.
    pub brightness_full: f32,

    /// Brightness multiplier for the two-layer and single modes. Default: 0.65.
    pub brightness_layered: f32,

    /// JPEG quality of the final image, 1–100. Default: 90.
    pub jpeg_quality: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1920,
            canvas_height: 1080,
            chars_per_line: 60,
            line_height: 60,
            band_padding: 40,
            min_band_height: 200,
            font_size: 48,
            font_family: "Arial, sans-serif".to_string(),
            font_dir: None,
            band_opacity: 0.75,
            brightness_full: 0.6,
            brightness_layered: 0.65,
            jpeg_quality: 90,
        }
    }
}

/// Configuration for the generation pipeline.
///
/// Built via [`GeneratorConfig::builder()`] or using
/// [`GeneratorConfig::default()`].
///
/// # Example
/// ```rust
/// use newsimage::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .per_page(5)
///     .jpeg_quality(85)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Compositor constants.
    pub layout: LayoutConfig,

    /// Candidates requested per photo search. Default: 5.
    ///
    /// Only the first candidate is used; a few extra keeps the index's
    /// ranking meaningful.
    pub per_page: u32,

    /// Content safety filter sent with each search. Default: High.
    pub content_filter: ContentFilter,

    /// Issue the three slot searches, and then the three downloads,
    /// concurrently. Default: true.
    ///
    /// The slots are independent; sequential mode exists for photo services
    /// with tight per-second rate limits.
    pub concurrent_slots: bool,

    /// Optional observer for per-stage events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            per_page: 5,
            content_filter: ContentFilter::default(),
            concurrent_slots: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("layout", &self.layout)
            .field("per_page", &self.per_page)
            .field("content_filter", &self.content_filter)
            .field("concurrent_slots", &self.concurrent_slots)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn per_page(mut self, n: u32) -> Self {
        self.config.per_page = n;
        self
    }

    pub fn content_filter(mut self, filter: ContentFilter) -> Self {
        self.config.content_filter = filter;
        self
    }

    pub fn concurrent_slots(mut self, v: bool) -> Self {
        self.config.concurrent_slots = v;
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.layout.jpeg_quality = q;
        self
    }

    pub fn font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.layout.font_dir = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, NewsImageError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl GeneratorConfig {
    /// Check the constraints [`GeneratorConfigBuilder::build`] enforces.
    ///
    /// The fields are public, so a config assembled by hand is validated
    /// again when an [`ImageGenerator`](crate::ImageGenerator) is created.
    pub fn validate(&self) -> Result<(), NewsImageError> {
        if self.per_page == 0 || self.per_page > 30 {
            return Err(NewsImageError::InvalidConfig(format!(
                "per_page must be 1–30, got {}",
                self.per_page
            )));
        }
        self.layout.validate()
    }
}

impl LayoutConfig {
    /// Reject layouts the compositor cannot render.
    pub fn validate(&self) -> Result<(), NewsImageError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(NewsImageError::InvalidConfig(
                "Canvas dimensions must be non-zero".into(),
            ));
        }
        if self.chars_per_line == 0 || self.line_height == 0 {
            return Err(NewsImageError::InvalidConfig(
                "chars_per_line and line_height must be ≥ 1".into(),
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(NewsImageError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                self.jpeg_quality
            )));
        }
        if !(0.0..=1.0).contains(&self.band_opacity) {
            return Err(NewsImageError::InvalidConfig(format!(
                "Band opacity must be 0.0–1.0, got {}",
                self.band_opacity
            )));
        }
        for b in [self.brightness_full, self.brightness_layered] {
            if !b.is_finite() || b < 0.0 {
                return Err(NewsImageError::InvalidConfig(format!(
                    "Brightness factors must be finite and ≥ 0, got {b}"
                )));
            }
        }
        Ok(())
    }
}
