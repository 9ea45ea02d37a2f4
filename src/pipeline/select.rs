//! Photo selection: one search per populated slot, best match wins.
//!
//! Each slot resolves to a [`SlotOutcome`] on its own; a failed or empty
//! search never aborts the others. After the three slot searches settle, the
//! fallback rule runs: when the background is still empty and the strategy
//! has a main subject, the main query is searched again in landscape
//! orientation to give the compositor a base layer.
//!
//! | Slot | Orientation |
//! |------|-------------|
//! | main subject | portrait |
//! | secondary subject | landscape |
//! | background (and fallback) | landscape |

use crate::config::GeneratorConfig;
use crate::error::TransportError;
use crate::pipeline::plan::{SearchSlot, Strategy};
use crate::transport::{Orientation, Photo, PhotoIndex, SearchOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// One of the three named search roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Main,
    Secondary,
    Background,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Main, Slot::Secondary, Slot::Background];

    /// Orientation requested when searching for this slot.
    pub fn orientation(&self) -> Orientation {
        match self {
            Slot::Main => Orientation::Portrait,
            Slot::Secondary | Slot::Background => Orientation::Landscape,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::Main => "main",
            Slot::Secondary => "secondary",
            Slot::Background => "background",
        })
    }
}

/// Up to one value per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMap<T> {
    pub main: Option<T>,
    pub secondary: Option<T>,
    pub background: Option<T>,
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self {
            main: None,
            secondary: None,
            background: None,
        }
    }
}

impl<T> SlotMap<T> {
    pub fn get(&self, slot: Slot) -> Option<&T> {
        match slot {
            Slot::Main => self.main.as_ref(),
            Slot::Secondary => self.secondary.as_ref(),
            Slot::Background => self.background.as_ref(),
        }
    }

    /// Number of populated slots.
    pub fn count(&self) -> usize {
        Slot::ALL.iter().filter(|s| self.get(**s).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// True when a base layer exists: main or background is present.
    pub fn has_base_layer(&self) -> bool {
        self.main.is_some() || self.background.is_some()
    }
}

/// Photos chosen for a strategy, keyed by slot.
pub type PhotoSet = SlotMap<Photo>;

/// Why a slot has no photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsentReason {
    /// The strategy left the slot empty, or its query was blank.
    NoQuery,
    /// The index answered with zero results.
    NoMatch,
    /// The search request failed.
    Transport(TransportError),
}

/// Result of resolving one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotOutcome {
    Found(Photo),
    Absent(AbsentReason),
}

impl SlotOutcome {
    pub fn photo(&self) -> Option<&Photo> {
        match self {
            SlotOutcome::Found(p) => Some(p),
            SlotOutcome::Absent(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SlotOutcome::Found(_))
    }
}

/// Per-slot outcomes of one selection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub main: SlotOutcome,
    pub secondary: SlotOutcome,
    pub background: SlotOutcome,
    /// The background came from the main-subject fallback query.
    pub used_fallback: bool,
}

impl Selection {
    /// Collapse the outcomes into the photo set handed to download.
    pub fn photo_set(&self) -> PhotoSet {
        PhotoSet {
            main: self.main.photo().cloned(),
            secondary: self.secondary.photo().cloned(),
            background: self.background.photo().cloned(),
        }
    }
}

/// Resolve one slot: search, keep the first candidate.
pub async fn find_best_photo(
    index: &dyn PhotoIndex,
    slot: Option<&SearchSlot>,
    orientation: Orientation,
    config: &GeneratorConfig,
) -> SlotOutcome {
    let Some(slot) = slot else {
        return SlotOutcome::Absent(AbsentReason::NoQuery);
    };
    let query = slot.query.trim();
    if query.is_empty() {
        return SlotOutcome::Absent(AbsentReason::NoQuery);
    }

    let options = SearchOptions {
        per_page: config.per_page,
        orientation,
        content_filter: config.content_filter,
    };

    match index.search(query, &options).await {
        Ok(photos) => match photos.into_iter().next() {
            Some(photo) => SlotOutcome::Found(photo),
            None => {
                debug!("No photos for \"{}\" ({})", query, orientation);
                SlotOutcome::Absent(AbsentReason::NoMatch)
            }
        },
        Err(e) => {
            warn!("Search for \"{}\" failed: {}", query, e);
            SlotOutcome::Absent(AbsentReason::Transport(e))
        }
    }
}

/// Select at most one photo per slot for `strategy`. Never fails.
pub async fn select_photos(
    index: &dyn PhotoIndex,
    strategy: &Strategy,
    config: &GeneratorConfig,
) -> Selection {
    let main_fut = find_best_photo(
        index,
        strategy.main_subject.as_ref(),
        Slot::Main.orientation(),
        config,
    );
    let secondary_fut = find_best_photo(
        index,
        strategy.secondary_subject.as_ref(),
        Slot::Secondary.orientation(),
        config,
    );
    let background_fut = find_best_photo(
        index,
        strategy.background.as_ref(),
        Slot::Background.orientation(),
        config,
    );

    let (main, secondary, mut background) = if config.concurrent_slots {
        futures::join!(main_fut, secondary_fut, background_fut)
    } else {
        (main_fut.await, secondary_fut.await, background_fut.await)
    };

    let notify = |slot: Slot, outcome: &SlotOutcome| {
        if let Some(ref cb) = config.progress_callback {
            cb.on_slot_resolved(slot, outcome.is_found());
        }
    };
    notify(Slot::Main, &main);
    notify(Slot::Secondary, &secondary);
    notify(Slot::Background, &background);

    let mut used_fallback = false;
    if !background.is_found() && strategy.main_subject.is_some() {
        debug!("No background photo; retrying with the main subject query");
        background = find_best_photo(
            index,
            strategy.main_subject.as_ref(),
            Orientation::Landscape,
            config,
        )
        .await;
        used_fallback = true;
        notify(Slot::Background, &background);
    }

    let selection = Selection {
        main,
        secondary,
        background,
        used_fallback,
    };

    let id = |o: &SlotOutcome| o.photo().map_or("none".to_string(), |p| p.id.clone());
    info!(
        "Retrieved photos: main={}, secondary={}, background={}",
        id(&selection.main),
        id(&selection.secondary),
        id(&selection.background)
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::plan::TermKind;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            url: format!("https://img.test/{id}/regular"),
            download_url: format!("https://img.test/{id}/full"),
            width: 1600,
            height: 900,
            description: None,
            photographer: "Tester".into(),
            photographer_url: "https://img.test/@tester".into(),
        }
    }

    /// Answers from a `(query, orientation) → ids` table; records every call.
    #[derive(Default)]
    struct TableIndex {
        answers: HashMap<(String, Orientation), Vec<String>>,
        failing: Vec<String>,
        calls: Mutex<Vec<(String, Orientation)>>,
    }

    impl TableIndex {
        fn answer(mut self, query: &str, orientation: Orientation, ids: &[&str]) -> Self {
            self.answers.insert(
                (query.to_string(), orientation),
                ids.iter().map(|s| s.to_string()).collect(),
            );
            self
        }

        fn fail(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }

        fn calls(&self) -> Vec<(String, Orientation)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PhotoIndex for TableIndex {
        async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Photo>, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), options.orientation));
            if self.failing.iter().any(|q| q == query) {
                return Err(TransportError::Status {
                    url: "https://api.test/search/photos".into(),
                    status: 503,
                });
            }
            Ok(self
                .answers
                .get(&(query.to_string(), options.orientation))
                .map(|ids| ids.iter().map(|id| photo(id)).collect())
                .unwrap_or_default())
        }
    }

    fn strategy(main: Option<&str>, secondary: Option<&str>, background: Option<&str>) -> Strategy {
        Strategy {
            main_subject: main.map(|q| SearchSlot::new(TermKind::Person, q)),
            secondary_subject: secondary.map(|q| SearchSlot::new(TermKind::Object, q)),
            background: background.map(|q| SearchSlot::new(TermKind::Location, q)),
        }
    }

    #[tokio::test]
    async fn takes_first_candidate_per_slot() {
        let index = TableIndex::default()
            .answer("Prime Minister", Orientation::Portrait, &["pm1", "pm2"])
            .answer("podium", Orientation::Landscape, &["pod1"])
            .answer("New York", Orientation::Landscape, &["ny1", "ny2"]);
        let sel = select_photos(
            &index,
            &strategy(Some("Prime Minister"), Some("podium"), Some("New York")),
            &GeneratorConfig::default(),
        )
        .await;

        let set = sel.photo_set();
        assert_eq!(set.main.unwrap().id, "pm1");
        assert_eq!(set.secondary.unwrap().id, "pod1");
        assert_eq!(set.background.unwrap().id, "ny1");
        assert!(!sel.used_fallback);
    }

    #[tokio::test]
    async fn slot_orientations() {
        let index = TableIndex::default();
        select_photos(
            &index,
            &strategy(Some("a"), Some("b"), Some("c")),
            &GeneratorConfig::builder().concurrent_slots(false).build().unwrap(),
        )
        .await;
        let calls = index.calls();
        assert_eq!(calls[0], ("a".to_string(), Orientation::Portrait));
        assert_eq!(calls[1], ("b".to_string(), Orientation::Landscape));
        assert_eq!(calls[2], ("c".to_string(), Orientation::Landscape));
    }

    #[tokio::test]
    async fn fallback_populates_background_from_main_query() {
        let index = TableIndex::default()
            .answer("Prime Minister", Orientation::Portrait, &["pm-portrait"])
            .answer("Prime Minister", Orientation::Landscape, &["pm-landscape"]);
        let sel = select_photos(
            &index,
            &strategy(Some("Prime Minister"), None, None),
            &GeneratorConfig::default(),
        )
        .await;

        assert!(sel.used_fallback);
        assert_eq!(sel.background.photo().unwrap().id, "pm-landscape");
        assert_eq!(
            index.calls().last().unwrap(),
            &("Prime Minister".to_string(), Orientation::Landscape)
        );
    }

    #[tokio::test]
    async fn fallback_runs_when_background_query_matches_nothing() {
        let index = TableIndex::default()
            .answer("flood", Orientation::Landscape, &["flood-wide"]);
        let sel = select_photos(
            &index,
            &strategy(Some("flood"), None, Some("Nowhere")),
            &GeneratorConfig::default(),
        )
        .await;
        assert!(sel.used_fallback);
        assert_eq!(sel.main, SlotOutcome::Absent(AbsentReason::NoMatch));
        assert_eq!(sel.background.photo().unwrap().id, "flood-wide");
    }

    #[tokio::test]
    async fn no_fallback_without_main_subject() {
        let index = TableIndex::default();
        let sel = select_photos(&index, &strategy(None, None, None), &GeneratorConfig::default()).await;
        assert!(!sel.used_fallback);
        assert!(sel.photo_set().is_empty());
        assert!(index.calls().is_empty(), "empty slots must not hit the index");
    }

    #[tokio::test]
    async fn failed_slot_does_not_abort_others() {
        let index = TableIndex::default()
            .answer("Kathmandu", Orientation::Landscape, &["ktm"])
            .fail("temple");
        let sel = select_photos(
            &index,
            &strategy(None, Some("temple"), Some("Kathmandu")),
            &GeneratorConfig::default(),
        )
        .await;
        assert!(matches!(
            sel.secondary,
            SlotOutcome::Absent(AbsentReason::Transport(TransportError::Status { status: 503, .. }))
        ));
        assert_eq!(sel.background.photo().unwrap().id, "ktm");
    }

    #[tokio::test]
    async fn blank_query_is_not_searched() {
        let index = TableIndex::default();
        let outcome = find_best_photo(
            &index,
            Some(&SearchSlot::new(TermKind::General, "   ")),
            Orientation::Landscape,
            &GeneratorConfig::default(),
        )
        .await;
        assert_eq!(outcome, SlotOutcome::Absent(AbsentReason::NoQuery));
        assert!(index.calls().is_empty());
    }

    #[test]
    fn slot_map_base_layer() {
        let mut set = PhotoSet::default();
        assert!(!set.has_base_layer());
        set.secondary = Some(photo("s"));
        assert!(!set.has_base_layer());
        assert_eq!(set.count(), 1);
        set.background = Some(photo("b"));
        assert!(set.has_base_layer());
    }
}
