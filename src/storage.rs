//! Persistence of generated images, one file per article.
//!
//! [`LocalImageStore`] writes `news_{id}.jpg` into a directory. Writes are
//! atomic (temp file + rename) so a reader never sees a half-written image.

use crate::error::NewsImageError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default output directory for [`LocalImageStore`].
pub const DEFAULT_IMAGE_DIR: &str = "public/generated";

/// File name of the image stored for `article_id`.
pub fn image_file_name(article_id: u64) -> String {
    format!("news_{}.jpg", article_id)
}

/// Where generated images live.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// True when an image for this article is already stored.
    async fn exists(&self, article_id: u64) -> Result<bool, NewsImageError>;

    /// Store `bytes` for the article, replacing any previous image.
    /// Returns the image's locator.
    async fn store(&self, article_id: u64, bytes: &[u8]) -> Result<String, NewsImageError>;

    /// Remove the article's image. Returns `false` when there was none.
    async fn delete(&self, article_id: u64) -> Result<bool, NewsImageError>;

    /// Public URL or path of the article's image, whether or not it exists.
    fn locator(&self, article_id: u64) -> String;
}

/// Stores images as files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    public_base_url: Option<String>,
}

impl Default for LocalImageStore {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_DIR)
    }
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: None,
        }
    }

    /// Report locators as `{base}/news_{id}.jpg` instead of filesystem paths.
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, article_id: u64) -> PathBuf {
        self.dir.join(image_file_name(article_id))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn exists(&self, article_id: u64) -> Result<bool, NewsImageError> {
        let path = self.path_for(article_id);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| NewsImageError::StoreFailed { path, source: e })
    }

    async fn store(&self, article_id: u64, bytes: &[u8]) -> Result<String, NewsImageError> {
        let path = self.path_for(article_id);
        let write_err = |e: std::io::Error| NewsImageError::StoreFailed {
            path: path.clone(),
            source: e,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        let tmp_path = path.with_extension("jpg.tmp");
        tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(write_err)?;

        info!("Saved image to: {}", path.display());
        Ok(self.locator(article_id))
    }

    async fn delete(&self, article_id: u64) -> Result<bool, NewsImageError> {
        let path = self.path_for(article_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted image: {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No image to delete at {}", path.display());
                Ok(false)
            }
            Err(e) => Err(NewsImageError::StoreFailed { path, source: e }),
        }
    }

    fn locator(&self, article_id: u64) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), image_file_name(article_id)),
            None => self.path_for(article_id).display().to_string(),
        }
    }
}
