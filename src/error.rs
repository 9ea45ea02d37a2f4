//! Error types for the newsimage library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`NewsImageError`]: **Fatal**: no image can be produced (article
//!   missing, no usable photo at all, corrupt photo bytes, store write
//!   failed). Returned as `Err(NewsImageError)` from the generator.
//!
//! * [`TransportError`]: **Non-fatal**: a single photo search or download
//!   failed. It is recorded in the affected slot as
//!   [`crate::pipeline::select::AbsentReason::Transport`] and the other slots
//!   carry on. It only matters to the caller if every slot ends up empty, at
//!   which point the generator reports [`NewsImageError::NoPhotosAvailable`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the newsimage library.
#[derive(Debug, Error)]
pub enum NewsImageError {
    // ── Article errors ────────────────────────────────────────────────────
    /// The article store has no article with this id.
    #[error("Article with id {id} not found")]
    NotFound { id: u64 },

    /// The article list could not be fetched or parsed.
    #[error("Failed to fetch articles from '{url}': {reason}")]
    ArticleFetchFailed { url: String, reason: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// Neither a main-subject nor a background photo could be resolved.
    #[error("No photos available for composition\nNo search slot returned a usable photo for this title.")]
    NoPhotosAvailable,

    /// Decoding, rendering, or encoding failed on the chosen photos.
    #[error("Image composition failed: {detail}")]
    CompositionFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the generated image.
    #[error("Failed to store image at '{path}': {source}")]
    StoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// No access key for the photo index.
    #[error("UNSPLASH_ACCESS_KEY not configured\nSet it in the environment or pass --access-key.")]
    MissingAccessKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of one photo search or download.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum TransportError {
    /// The request could not be sent or the connection dropped.
    #[error("request to '{url}' failed: {detail}")]
    Request { url: String, detail: String },

    /// The remote answered with a non-success status.
    #[error("'{url}' answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body was not what we expected.
    #[error("could not decode response from '{url}': {detail}")]
    Decode { url: String, detail: String },

    /// The request exceeded its timeout.
    #[error("request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
}

impl TransportError {
    /// Classify a `reqwest` failure for `url`.
    pub(crate) fn from_reqwest(url: &str, timeout_secs: u64, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else if e.is_decode() {
            TransportError::Decode {
                url: url.to_string(),
                detail: e.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                detail: e.to_string(),
            }
        }
    }
}
