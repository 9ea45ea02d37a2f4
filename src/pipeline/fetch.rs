//! Photo download: resolve each selected [`Photo`] to its raw bytes.
//!
//! Downloads run concurrently unless the caller asks for one at a time,
//! following the same switch as the searches. A failed download drops that
//! slot and is logged; it never aborts the other slots. Whether enough photos survived
//! to compose is for the compositor to decide.

use crate::pipeline::compose::PhotoBuffers;
use crate::pipeline::select::{PhotoSet, Slot};
use crate::transport::{Photo, PhotoDownloader};
use tracing::{debug, warn};

/// Download the full-resolution image of every photo in `photos`.
///
/// With `concurrent == false` the slots are fetched in order: main,
/// secondary, background.
pub async fn download_photos(downloader: &dyn PhotoDownloader, photos: &PhotoSet, concurrent: bool) -> PhotoBuffers {
    let main_fut = fetch_slot(downloader, Slot::Main, photos.main.as_ref());
    let secondary_fut = fetch_slot(downloader, Slot::Secondary, photos.secondary.as_ref());
    let background_fut = fetch_slot(downloader, Slot::Background, photos.background.as_ref());

    let (main, secondary, background) = if concurrent {
        futures::join!(main_fut, secondary_fut, background_fut)
    } else {
        (main_fut.await, secondary_fut.await, background_fut.await)
    };
    PhotoBuffers {
        main,
        secondary,
        background,
    }
}

async fn fetch_slot(downloader: &dyn PhotoDownloader, slot: Slot, photo: Option<&Photo>) -> Option<Vec<u8>> {
    let photo = photo?;
    match downloader.download(&photo.download_url).await {
        Ok(bytes) if bytes.is_empty() => {
            warn!("Downloaded {} photo {} is empty", slot, photo.id);
            None
        }
        Ok(bytes) => {
            debug!("Downloaded {} photo {} ({} bytes)", slot, photo.id, bytes.len());
            Some(bytes)
        }
        Err(e) => {
            warn!("Failed to download {} photo {}: {}", slot, photo.id, e);
            None
        }
    }
}
