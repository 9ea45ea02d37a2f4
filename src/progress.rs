//! Progress-callback trait for per-stage generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GeneratorConfigBuilder::progress_callback`] to observe the
//! pipeline as it extracts terms, plans searches, resolves each photo slot,
//! and composes the final image.
//!
//! # Example
//!
//! ```rust
//! use newsimage::{GenerationProgressCallback, GeneratorConfig, Slot};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FoundCounter {
//!     found: AtomicUsize,
//! }
//!
//! impl GenerationProgressCallback for FoundCounter {
//!     fn on_slot_resolved(&self, slot: Slot, found: bool) {
//!         if found {
//!             self.found.fetch_add(1, Ordering::SeqCst);
//!         }
//!         eprintln!("{slot}: {}", if found { "photo" } else { "none" });
//!     }
//! }
//!
//! let counter = Arc::new(FoundCounter { found: AtomicUsize::new(0) });
//!
//! let config = GeneratorConfig::builder()
//!     .progress_callback(counter as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::extract::CategorizedTerms;
use crate::pipeline::plan::Strategy;
use crate::pipeline::select::Slot;
use std::sync::Arc;

/// Called by the generator as each pipeline stage finishes.
///
/// Slot searches may run concurrently, so `on_slot_resolved` can be called
/// from different tasks; implementations must be `Send + Sync`. All methods
/// default to no-ops.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once before extraction starts.
    fn on_generation_start(&self, title: &str) {
        let _ = title;
    }

    /// Called after the title has been tagged.
    fn on_terms_extracted(&self, terms: &CategorizedTerms) {
        let _ = terms;
    }

    /// Called after the search strategy is fixed.
    fn on_strategy_planned(&self, strategy: &Strategy) {
        let _ = strategy;
    }

    /// Called once per slot after its search settled.
    ///
    /// The background slot may be reported twice when the fallback query
    /// runs: first as not found, then with the fallback result.
    fn on_slot_resolved(&self, slot: Slot, found: bool) {
        let _ = (slot, found);
    }

    /// Called when the final image has been encoded.
    ///
    /// # Arguments
    /// * `bytes`: size of the encoded image
    fn on_composed(&self, bytes: usize) {
        let _ = bytes;
    }

    /// Called after the image has been handed to the store.
    fn on_stored(&self, locator: &str) {
        let _ = locator;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GeneratorConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
