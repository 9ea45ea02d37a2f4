//! Network collaborators: photo search and raw image download.
//!
//! The pipeline only talks to these two traits, so the photo index can be
//! swapped (or faked in tests) without touching selection or composition.
//! [`unsplash::UnsplashClient`] implements both against the Unsplash API.

pub mod unsplash;

use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use unsplash::{UnsplashClient, UnsplashConfig};

/// Preferred photo orientation for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content safety level requested from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    Low,
    #[default]
    High,
}

impl ContentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFilter::Low => "low",
            ContentFilter::High => "high",
        }
    }
}

/// Parameters of one search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub per_page: u32,
    pub orientation: Orientation,
    pub content_filter: ContentFilter,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            per_page: 10,
            orientation: Orientation::Landscape,
            content_filter: ContentFilter::High,
        }
    }
}

/// Metadata of one photo returned by the index. Read-only once retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// Display-size URL.
    pub url: String,
    /// Full-resolution URL used for composition.
    pub download_url: String,
    pub width: u32,
    pub height: u32,
    pub description: Option<String>,
    pub photographer: String,
    pub photographer_url: String,
}

/// A searchable stock-photo index.
#[async_trait]
pub trait PhotoIndex: Send + Sync {
    /// Search for photos, best match first.
    ///
    /// "No results" is `Ok(vec![])`; `Err` is reserved for transport failures.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Photo>, TransportError>;
}

/// Fetches raw image bytes.
#[async_trait]
pub trait PhotoDownloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_strings() {
        assert_eq!(Orientation::Portrait.as_str(), "portrait");
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
        assert_eq!(serde_json::to_string(&Orientation::Squarish).unwrap(), "\"squarish\"");
    }

    #[test]
    fn search_options_default_to_landscape_high() {
        let o = SearchOptions::default();
        assert_eq!(o.per_page, 10);
        assert_eq!(o.orientation, Orientation::Landscape);
        assert_eq!(o.content_filter.as_str(), "high");
    }
}
