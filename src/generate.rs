//! Pipeline orchestration: title → terms → strategy → photos → image.
//!
//! [`ImageGenerator`] wires the stages together and owns the collaborators
//! (photo index, downloader, and optionally the article and image stores).
//! Every collaborator sits behind a trait object so tests can run the whole
//! pipeline offline.

use crate::articles::ArticleStore;
use crate::config::GeneratorConfig;
use crate::error::NewsImageError;
use crate::output::{GenerationOutput, GenerationStats, Inspection, StoredImage};
use crate::pipeline::compose::Compositor;
use crate::pipeline::extract::{EntityExtractor, HeuristicExtractor};
use crate::pipeline::{fetch, plan, select};
use crate::storage::ImageStore;
use crate::transport::{PhotoDownloader, PhotoIndex, UnsplashClient, UnsplashConfig};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs the generation pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use newsimage::{GeneratorConfig, ImageGenerator, UnsplashConfig};
///
/// # async fn run() -> Result<(), newsimage::NewsImageError> {
/// let generator = ImageGenerator::unsplash(GeneratorConfig::default(), UnsplashConfig::from_env()?)?;
/// let output = generator.generate("Prime Minister Visits New York").await?;
/// std::fs::write("news.jpg", &output.image.bytes).ok();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ImageGenerator {
    config: GeneratorConfig,
    extractor: Arc<dyn EntityExtractor>,
    index: Arc<dyn PhotoIndex>,
    downloader: Arc<dyn PhotoDownloader>,
    compositor: Compositor,
    articles: Option<Arc<dyn ArticleStore>>,
    images: Option<Arc<dyn ImageStore>>,
}

impl fmt::Debug for ImageGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageGenerator")
            .field("config", &self.config)
            .field("compositor", &self.compositor)
            .field("articles", &self.articles.is_some())
            .field("images", &self.images.is_some())
            .finish_non_exhaustive()
    }
}

impl ImageGenerator {
    /// Generator with the built-in extractor and no stores.
    ///
    /// # Errors
    /// [`NewsImageError::InvalidConfig`] when `config` fails
    /// [`GeneratorConfig::validate`].
    pub fn new(
        config: GeneratorConfig,
        index: Arc<dyn PhotoIndex>,
        downloader: Arc<dyn PhotoDownloader>,
    ) -> Result<Self, NewsImageError> {
        config.validate()?;
        let compositor = Compositor::new(config.layout.clone());
        Ok(Self {
            config,
            extractor: Arc::new(HeuristicExtractor),
            index,
            downloader,
            compositor,
            articles: None,
            images: None,
        })
    }

    /// Generator that searches and downloads through one Unsplash client.
    pub fn unsplash(config: GeneratorConfig, unsplash: UnsplashConfig) -> Result<Self, NewsImageError> {
        let client = Arc::new(UnsplashClient::new(unsplash)?);
        Self::new(config, client.clone(), client)
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_article_store(mut self, store: Arc<dyn ArticleStore>) -> Self {
        self.articles = Some(store);
        self
    }

    pub fn with_image_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.images = Some(store);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Extraction and planning only. No network.
    pub fn inspect(&self, title: &str) -> Inspection {
        let terms = self.extractor.extract(title);
        let strategy = plan::plan(&terms);
        Inspection {
            title: title.to_string(),
            terms,
            strategy,
        }
    }

    /// Run the full pipeline for `title` and return the encoded image.
    ///
    /// # Errors
    /// - [`NewsImageError::NoPhotosAvailable`] when neither a main-subject
    ///   nor a background photo could be found and downloaded
    /// - [`NewsImageError::CompositionFailed`] when the chosen photo cannot
    ///   be decoded or the result cannot be encoded
    pub async fn generate(&self, title: &str) -> Result<GenerationOutput, NewsImageError> {
        let total_start = Instant::now();
        let cb = self.config.progress_callback.as_ref();
        info!("Starting image generation: \"{}\"", title);
        if let Some(cb) = cb {
            cb.on_generation_start(title);
        }

        // ── Step 1: Extract terms ────────────────────────────────────────────
        let terms = self.extractor.extract(title);
        debug!(?terms, "Extracted terms");
        if let Some(cb) = cb {
            cb.on_terms_extracted(&terms);
        }

        // ── Step 2: Plan searches ────────────────────────────────────────────
        let strategy = plan::plan(&terms);
        if let Some(cb) = cb {
            cb.on_strategy_planned(&strategy);
        }

        // ── Step 3: Select photos ────────────────────────────────────────────
        let search_start = Instant::now();
        let selection = select::select_photos(self.index.as_ref(), &strategy, &self.config).await;
        let search_duration_ms = search_start.elapsed().as_millis() as u64;
        let photos = selection.photo_set();
        if !photos.has_base_layer() {
            info!("No main or background photo for \"{}\"", title);
            return Err(NewsImageError::NoPhotosAvailable);
        }

        // ── Step 4: Download ─────────────────────────────────────────────────
        let download_start = Instant::now();
        let buffers = fetch::download_photos(self.downloader.as_ref(), &photos, self.config.concurrent_slots).await;
        let download_duration_ms = download_start.elapsed().as_millis() as u64;
        let photos_downloaded = buffers.count();

        // ── Step 5: Compose ──────────────────────────────────────────────────
        let compose_start = Instant::now();
        let image = self.compositor.compose(buffers, title).await?;
        let compose_duration_ms = compose_start.elapsed().as_millis() as u64;
        if let Some(cb) = cb {
            cb.on_composed(image.bytes.len());
        }

        let stats = GenerationStats {
            photos_found: photos.count(),
            photos_downloaded,
            used_fallback: selection.used_fallback,
            mode: image.mode,
            image_bytes: image.bytes.len(),
            search_duration_ms,
            download_duration_ms,
            compose_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };

        info!(
            "Generation complete: {} mode, {} bytes, {}ms total",
            stats.mode, stats.image_bytes, stats.total_duration_ms
        );

        Ok(GenerationOutput {
            image,
            terms,
            strategy,
            selection,
            stats,
        })
    }

    /// Return the stored image for an article, generating it on first request.
    ///
    /// An image already in the store is returned as-is without looking the
    /// article up. Requires both an article store and an image store.
    ///
    /// # Errors
    /// - [`NewsImageError::NotFound`] when the article store has no such id
    /// - any error from [`ImageGenerator::generate`] or the stores
    pub async fn generate_for_article(&self, article_id: u64) -> Result<StoredImage, NewsImageError> {
        let images = self.image_store()?;
        if images.exists(article_id).await? {
            info!("Cache hit for article {}", article_id);
            return Ok(StoredImage::Existing {
                article_id,
                locator: images.locator(article_id),
            });
        }
        self.regenerate_for_article(article_id).await
    }

    /// Generate and store an article's image, replacing any stored one.
    pub async fn regenerate_for_article(&self, article_id: u64) -> Result<StoredImage, NewsImageError> {
        let images = self.image_store()?;
        let articles = self
            .articles
            .as_ref()
            .ok_or_else(|| NewsImageError::InvalidConfig("no article store configured".into()))?;

        let article = articles
            .article_by_id(article_id)
            .await?
            .ok_or(NewsImageError::NotFound { id: article_id })?;
        info!("Generating image for article {}: \"{}\"", article_id, article.title);

        let output = self.generate(&article.title).await?;
        let locator = images.store(article_id, &output.image.bytes).await?;
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stored(&locator);
        }

        Ok(StoredImage::Generated {
            article_id,
            locator,
            output: Box::new(output),
        })
    }

    /// Remove an article's stored image. `Ok(false)` when there was none.
    pub async fn delete_image(&self, article_id: u64) -> Result<bool, NewsImageError> {
        self.image_store()?.delete(article_id).await
    }

    fn image_store(&self) -> Result<&Arc<dyn ImageStore>, NewsImageError> {
        self.images
            .as_ref()
            .ok_or_else(|| NewsImageError::InvalidConfig("no image store configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::{Photo, SearchOptions};
    use async_trait::async_trait;

    struct EmptyIndex;

    #[async_trait]
    impl PhotoIndex for EmptyIndex {
        async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<Photo>, TransportError> {
            Ok(Vec::new())
        }
    }

    struct NoDownloads;

    #[async_trait]
    impl PhotoDownloader for NoDownloads {
        async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn generator() -> ImageGenerator {
        ImageGenerator::new(GeneratorConfig::default(), Arc::new(EmptyIndex), Arc::new(NoDownloads)).unwrap()
    }

    #[test]
    fn hand_built_config_is_validated() {
        let mut config = GeneratorConfig::default();
        config.layout.canvas_width = 0;
        let err = ImageGenerator::new(config, Arc::new(EmptyIndex), Arc::new(NoDownloads)).unwrap_err();
        assert!(matches!(err, NewsImageError::InvalidConfig(_)), "{err}");

        let config = GeneratorConfig {
            per_page: 0,
            ..GeneratorConfig::default()
        };
        let err = ImageGenerator::new(config, Arc::new(EmptyIndex), Arc::new(NoDownloads)).unwrap_err();
        assert!(matches!(err, NewsImageError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn inspect_runs_extraction_and_planning() {
        let report = generator().inspect("Prime Minister Visits New York");
        assert_eq!(report.terms.people, vec!["Prime Minister"]);
        assert_eq!(report.strategy.main_subject.unwrap().query, "Prime Minister");
        assert_eq!(report.strategy.background.unwrap().query, "New York");
    }

    #[tokio::test]
    async fn nothing_found_is_no_photos() {
        let err = generator().generate("Prime Minister Visits New York").await.unwrap_err();
        assert!(matches!(err, NewsImageError::NoPhotosAvailable));
    }

    #[tokio::test]
    async fn empty_title_is_no_photos() {
        let err = generator().generate("").await.unwrap_err();
        assert!(matches!(err, NewsImageError::NoPhotosAvailable));
    }

    #[tokio::test]
    async fn article_generation_needs_stores() {
        let err = generator().generate_for_article(1).await.unwrap_err();
        assert!(matches!(err, NewsImageError::InvalidConfig(_)));
    }
}
