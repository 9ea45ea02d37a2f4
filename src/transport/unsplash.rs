//! Unsplash implementation of [`PhotoIndex`] and [`PhotoDownloader`].
//!
//! Search calls `GET {base}/search/photos` authenticated with
//! `Authorization: Client-ID {key}`. Each result is reduced to a [`Photo`]:
//! `urls.regular` for display, `urls.full` for composition, and the
//! photographer's name and profile link for attribution.

use super::{Photo, PhotoDownloader, PhotoIndex, SearchOptions};
use crate::error::{NewsImageError, TransportError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.unsplash.com";

/// Connection settings for [`UnsplashClient`].
#[derive(Clone)]
pub struct UnsplashConfig {
    /// API access key (the "Client-ID").
    pub access_key: String,
    /// API base URL. Default: [`DEFAULT_API_URL`].
    pub api_url: String,
    /// Per-search timeout in seconds. Default: 10.
    pub search_timeout_secs: u64,
    /// Per-download timeout in seconds. Default: 30.
    ///
    /// Full-resolution photos run to several megabytes.
    pub download_timeout_secs: u64,
}

impl std::fmt::Debug for UnsplashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsplashConfig")
            .field("access_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl UnsplashConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            search_timeout_secs: 10,
            download_timeout_secs: 30,
        }
    }

    /// Read the access key from `UNSPLASH_ACCESS_KEY`.
    pub fn from_env() -> Result<Self, NewsImageError> {
        match std::env::var("UNSPLASH_ACCESS_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(NewsImageError::MissingAccessKey),
        }
    }
}

/// HTTP client for the Unsplash API.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    config: UnsplashConfig,
}

impl UnsplashClient {
    pub fn new(config: UnsplashConfig) -> Result<Self, NewsImageError> {
        if config.access_key.trim().is_empty() {
            return Err(NewsImageError::MissingAccessKey);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("newsimage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NewsImageError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        format!("{}/search/photos", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PhotoIndex for UnsplashClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Photo>, TransportError> {
        let url = self.search_url();
        let timeout = self.config.search_timeout_secs;
        let per_page = options.per_page.to_string();
        info!("Searching Unsplash for: \"{}\" ({})", query, options.orientation);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(timeout))
            .header("Authorization", format!("Client-ID {}", self.config.access_key))
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", options.orientation.as_str()),
                ("content_filter", options.content_filter.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, timeout, e))?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, timeout, e))?;

        let photos: Vec<Photo> = body.results.into_iter().map(Photo::from).collect();
        debug!("Found {} photos for \"{}\"", photos.len(), query);
        Ok(photos)
    }
}

#[async_trait]
impl PhotoDownloader for UnsplashClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let timeout = self.config.download_timeout_secs;
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(timeout))
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, timeout, e))?;

        if !response.status().is_success() {
            warn!("Download of {} answered HTTP {}", url, response.status());
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(url, timeout, e))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    id: String,
    width: u32,
    height: u32,
    description: Option<String>,
    alt_description: Option<String>,
    urls: ApiUrls,
    user: ApiUser,
}

#[derive(Debug, Deserialize)]
struct ApiUrls {
    regular: String,
    full: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    name: String,
    links: ApiUserLinks,
}

#[derive(Debug, Deserialize)]
struct ApiUserLinks {
    html: String,
}

impl From<ApiPhoto> for Photo {
    fn from(p: ApiPhoto) -> Self {
        Photo {
            id: p.id,
            url: p.urls.regular,
            download_url: p.urls.full,
            width: p.width,
            height: p.height,
            description: p.description.or(p.alt_description),
            photographer: p.user.name,
            photographer_url: p.user.links.html,
        }
    }
}
