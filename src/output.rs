//! Output types returned by the generator.

use crate::pipeline::compose::{ComposedImage, CompositionMode};
use crate::pipeline::extract::CategorizedTerms;
use crate::pipeline::plan::Strategy;
use crate::pipeline::select::{PhotoSet, Selection};
use serde::{Deserialize, Serialize};

/// Everything produced by one run of the pipeline.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The encoded image.
    pub image: ComposedImage,
    /// Terms extracted from the title.
    pub terms: CategorizedTerms,
    /// Queries derived from the terms.
    pub strategy: Strategy,
    /// Per-slot search outcomes, including why a slot stayed empty.
    pub selection: Selection,
    pub stats: GenerationStats,
}

impl GenerationOutput {
    /// Photos that were selected, for attribution.
    pub fn photos(&self) -> PhotoSet {
        self.selection.photo_set()
    }
}

/// Counters and timings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Slots that resolved to a photo.
    pub photos_found: usize,
    /// Photos that downloaded successfully.
    pub photos_downloaded: usize,
    /// The background came from the main-subject fallback query.
    pub used_fallback: bool,
    pub mode: CompositionMode,
    /// Size of the encoded image.
    pub image_bytes: usize,
    pub search_duration_ms: u64,
    pub download_duration_ms: u64,
    pub compose_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Result of [`crate::ImageGenerator::inspect`]: extraction and planning
/// only, no network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub title: String,
    pub terms: CategorizedTerms,
    pub strategy: Strategy,
}

/// Outcome of article-level generation.
#[derive(Debug, Clone)]
pub enum StoredImage {
    /// An image for this article was already stored; nothing was generated.
    Existing { article_id: u64, locator: String },
    /// A new image was generated and stored.
    Generated {
        article_id: u64,
        locator: String,
        output: Box<GenerationOutput>,
    },
}

impl StoredImage {
    pub fn article_id(&self) -> u64 {
        match self {
            StoredImage::Existing { article_id, .. } | StoredImage::Generated { article_id, .. } => *article_id,
        }
    }

    /// Where the image can be fetched: a public URL or a filesystem path.
    pub fn locator(&self) -> &str {
        match self {
            StoredImage::Existing { locator, .. } | StoredImage::Generated { locator, .. } => locator,
        }
    }

    /// True when the image was served from the store without regenerating.
    pub fn is_cached(&self) -> bool {
        matches!(self, StoredImage::Existing { .. })
    }
}
