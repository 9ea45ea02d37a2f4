//! # newsimage
//!
//! Turn a news headline into an illustrative 1920×1080 image: stock photos
//! chosen from the entities in the title, darkened, and captioned with the
//! full headline.
//!
//! ## Pipeline Overview
//!
//! ```text
//! title
//!  │
//!  ├─ 1. Extract  people / locations / objects / general terms
//!  ├─ 2. Plan     main subject, secondary subject, background queries
//!  ├─ 3. Select   one photo search per slot (+ landscape fallback)
//!  ├─ 4. Fetch    download each photo; a failure drops that slot
//!  ├─ 5. Compose  mode pick, cover-crop, darken, caption band (spawn_blocking)
//!  └─ 6. Encode   JPEG, quality 90
//! ```
//!
//! Stages 1–2 are pure and need no network; [`ImageGenerator::inspect`]
//! runs just those.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use newsimage::{GeneratorConfig, ImageGenerator, UnsplashConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads UNSPLASH_ACCESS_KEY
//!     let generator = ImageGenerator::unsplash(GeneratorConfig::default(), UnsplashConfig::from_env()?)?;
//!     let output = generator.generate("Prime Minister Visits New York").await?;
//!     std::fs::write("news.jpg", &output.image.bytes)?;
//!     eprintln!("{} mode, {} photos", output.stats.mode, output.stats.photos_downloaded);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `newsimage` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! newsimage = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod articles;
pub mod config;
pub mod error;
pub mod generate;
pub mod lexicon;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod storage;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use articles::{Article, ArticleStore, HttpArticleStore};
pub use config::{GeneratorConfig, GeneratorConfigBuilder, LayoutConfig};
pub use error::{NewsImageError, TransportError};
pub use generate::ImageGenerator;
pub use output::{GenerationOutput, GenerationStats, Inspection, StoredImage};
pub use pipeline::compose::{ComposedImage, CompositionMode, Compositor, PhotoBuffers};
pub use pipeline::extract::{extract, CategorizedTerms, EntityExtractor, HeuristicExtractor};
pub use pipeline::plan::{plan, SearchSlot, Strategy, TermKind};
pub use pipeline::select::{select_photos, AbsentReason, PhotoSet, Selection, Slot, SlotOutcome};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use storage::{ImageStore, LocalImageStore};
pub use transport::{
    ContentFilter, Orientation, Photo, PhotoDownloader, PhotoIndex, SearchOptions, UnsplashClient, UnsplashConfig,
};
