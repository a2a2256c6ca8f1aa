use std::collections::{HashMap, HashSet};

use dioxus::prelude::*;

use groupdrop_common::catalog::Catalog;
use groupdrop_common::drop::Drop;

/// Store-sourced state shared across all components.
///
/// Updated reactively as responses from the drop store arrive (or, in demo
/// mode, as local joins commit). Components read from this for anything
/// cross-page: drop rows, catalogs, errors, in-flight joins.
#[derive(Clone, Debug, Default)]
pub struct SharedState {
    /// Drop rows keyed by slug.
    pub drops: HashMap<String, Drop>,
    /// Catalogs keyed by drop slug.
    pub catalogs: HashMap<String, Catalog>,
    /// Whether the last store round trip succeeded.
    pub connected: bool,
    /// Last error message surfaced to the visitor.
    pub last_error: Option<String>,
    /// Slugs with a join in flight; the join button ignores re-entry.
    pub joining: HashSet<String>,
    /// Accepted amount of the most recent join per slug, for the banner.
    pub last_joined: HashMap<String, u64>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_for(&self, slug: &str) -> Option<&Drop> {
        self.drops.get(slug)
    }

    /// All drops sorted by slug for a stable card order.
    pub fn drop_entries(&self) -> Vec<&Drop> {
        let mut entries: Vec<_> = self.drops.values().collect();
        entries.sort_by(|a, b| a.slug.cmp(&b.slug));
        entries
    }
}

pub fn use_shared_state() -> Signal<SharedState> {
    use_context::<Signal<SharedState>>()
}
