//! Article lookup: fetch the article list from a JSON API and find titles by id.
//!
//! [`HttpArticleStore`] downloads the whole list in one request and keeps it
//! for a fixed TTL, so a burst of lookups costs a single round trip.

use crate::error::NewsImageError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Default article API endpoint.
pub const DEFAULT_ARTICLES_URL: &str = "https://dailyfeed.teletechnepal.com/api/articles";

/// How long a fetched article list stays fresh. Default: 300 s.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// One news article. Only `id` and `title` matter here; every other field
/// is kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: u64,
    pub title: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Article {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            extra: serde_json::Map::new(),
        }
    }
}

fn id_from_number_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Str(String),
    }
    match Id::deserialize(d)? {
        Id::Num(n) => Ok(n),
        Id::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Source of articles.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// All known articles.
    async fn articles(&self) -> Result<Arc<Vec<Article>>, NewsImageError>;

    /// The article with `id`, or `Ok(None)` when there is none.
    async fn article_by_id(&self, id: u64) -> Result<Option<Article>, NewsImageError> {
        let articles = self.articles().await?;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }
}

/// Accepts either `{ "articles": [...] }` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArticlesBody {
    Bare(Vec<Article>),
    Wrapped { articles: Vec<Article> },
}

/// Parse an article-list response body.
pub fn parse_articles(body: &[u8]) -> Result<Vec<Article>, serde_json::Error> {
    Ok(match serde_json::from_slice(body)? {
        ArticlesBody::Wrapped { articles } => articles,
        ArticlesBody::Bare(articles) => articles,
    })
}

/// Article store backed by an HTTP JSON endpoint with a TTL cache.
#[derive(Debug)]
pub struct HttpArticleStore {
    client: reqwest::Client,
    url: String,
    timeout_secs: u64,
    ttl: Duration,
    cache: RwLock<Option<(Instant, Arc<Vec<Article>>)>>,
}

impl HttpArticleStore {
    pub fn new(url: impl Into<String>) -> Result<Self, NewsImageError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newsimage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NewsImageError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout_secs: 10,
            ttl: DEFAULT_TTL,
            cache: RwLock::new(None),
        })
    }

    /// Use `ARTICLES_API_URL`, falling back to [`DEFAULT_ARTICLES_URL`].
    pub fn from_env() -> Result<Self, NewsImageError> {
        let url = std::env::var("ARTICLES_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ARTICLES_URL.to_string());
        Self::new(url)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Drop the cached list so the next lookup refetches.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn fetch(&self) -> Result<Vec<Article>, NewsImageError> {
        info!("Fetching articles from {}", self.url);
        let fail = |reason: String| NewsImageError::ArticleFetchFailed {
            url: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    fail(format!("timed out after {}s", self.timeout_secs))
                } else {
                    fail(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let body = response.bytes().await.map_err(|e| fail(e.to_string()))?;
        let articles = parse_articles(&body).map_err(|e| fail(format!("invalid JSON: {e}")))?;
        info!("Fetched {} articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl ArticleStore for HttpArticleStore {
    async fn articles(&self) -> Result<Arc<Vec<Article>>, NewsImageError> {
        if let Some((fetched_at, articles)) = self.cache.read().await.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                debug!("Using cached articles ({} entries)", articles.len());
                return Ok(Arc::clone(articles));
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some((fetched_at, articles)) = cache.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(articles));
            }
        }
        let articles = Arc::new(self.fetch().await?);
        *cache = Some((Instant::now(), Arc::clone(&articles)));
        Ok(articles)
    }
}
