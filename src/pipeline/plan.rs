//! Strategy planning: map extracted terms onto the three photo-search slots.
//!
//! | Slot | Priority (first match wins) |
//! |------|-----------------------------|
//! | main subject | first person → first object → first general term |
//! | secondary subject | second object → the only object, if a person holds main |
//! | background | first location → second general term |
//!
//! Reusing the single object for the secondary slot keeps a person-led
//! headline from losing its only concrete subject.

use crate::pipeline::extract::CategorizedTerms;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The category a search query was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Person,
    Object,
    Location,
    General,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TermKind::Person => "person",
            TermKind::Object => "object",
            TermKind::Location => "location",
            TermKind::General => "general",
        })
    }
}

/// One populated search slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSlot {
    pub kind: TermKind,
    pub query: String,
}

impl SearchSlot {
    pub fn new(kind: TermKind, query: impl Into<String>) -> Self {
        Self {
            kind,
            query: query.into(),
        }
    }
}

/// The up-to-three queries derived from one title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub main_subject: Option<SearchSlot>,
    pub secondary_subject: Option<SearchSlot>,
    pub background: Option<SearchSlot>,
}

impl Strategy {
    /// True when no slot has a query.
    pub fn is_empty(&self) -> bool {
        self.main_subject.is_none() && self.secondary_subject.is_none() && self.background.is_none()
    }
}

/// Derive the search strategy from extracted terms. Pure and deterministic.
pub fn plan(terms: &CategorizedTerms) -> Strategy {
    let main_subject = terms
        .people
        .first()
        .map(|p| SearchSlot::new(TermKind::Person, p))
        .or_else(|| terms.objects.first().map(|o| SearchSlot::new(TermKind::Object, o)))
        .or_else(|| terms.general.first().map(|g| SearchSlot::new(TermKind::General, g)));

    let secondary_subject = match terms.objects.as_slice() {
        [_, second, ..] => Some(SearchSlot::new(TermKind::Object, second)),
        [only] if !terms.people.is_empty() => Some(SearchSlot::new(TermKind::Object, only)),
        _ => None,
    };

    let background = terms
        .locations
        .first()
        .map(|l| SearchSlot::new(TermKind::Location, l))
        .or_else(|| terms.general.get(1).map(|g| SearchSlot::new(TermKind::General, g)));

    let strategy = Strategy {
        main_subject,
        secondary_subject,
        background,
    };
    debug!(?strategy, "Planned search strategy");
    strategy
}
