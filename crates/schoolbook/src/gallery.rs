//! The school listing and search flow.

use serde::Serialize;
use tracing::debug;

use crate::school::SchoolRecord;
use crate::seed::SeedProvider;
use crate::storage::RecordStore;

/// Records whose name, city or state contains `term`, ignoring case.
///
/// An empty term returns every record. Order is preserved.
#[must_use]
pub fn filter_schools<'a>(records: &'a [SchoolRecord], term: &str) -> Vec<&'a SchoolRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.matches_lowercase(&needle))
        .collect()
}

/// Which empty state to show when no records are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Nothing has been registered and no seed records are shown.
    NoSchools,
    /// Records exist but none match the search term.
    NoMatches,
}

impl EmptyState {
    /// Heading text.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::NoSchools => "No schools registered yet",
            Self::NoMatches => "No schools found",
        }
    }

    /// Explanatory text under the heading.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoSchools => "Get started by adding your first school to the system.",
            Self::NoMatches => "Try adjusting your search terms to find schools.",
        }
    }

    /// Whether to offer a link to the add-school page.
    #[must_use]
    pub const fn offers_add_link(self) -> bool {
        matches!(self, Self::NoSchools)
    }
}

/// State of the school listing page.
#[derive(Debug, Clone, Default)]
pub struct SchoolGallery {
    records: Vec<SchoolRecord>,
    seeded: bool,
    search_term: String,
}

impl SchoolGallery {
    /// Load the listing from `store`.
    ///
    /// If the store holds no records, the seed provider's records are shown
    /// instead. They are never written back.
    #[must_use]
    pub fn load(store: &dyn RecordStore, seed: &dyn SeedProvider) -> Self {
        let stored = store.load();
        let (records, seeded) = if stored.is_empty() {
            (seed.seed_records(), true)
        } else {
            (stored, false)
        };
        debug!(count = records.len(), seeded, "Loaded school listing");
        Self {
            records,
            seeded,
            search_term: String::new(),
        }
    }

    /// Build a listing over an explicit set of records.
    #[must_use]
    pub fn from_records(records: Vec<SchoolRecord>) -> Self {
        Self {
            records,
            seeded: false,
            search_term: String::new(),
        }
    }

    /// Replace the search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The current search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Every loaded record, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }

    /// Whether the records shown are demonstration data.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Records matching the current search term.
    #[must_use]
    pub fn filtered(&self) -> Vec<&SchoolRecord> {
        filter_schools(&self.records, &self.search_term)
    }

    /// Number of loaded records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// The "Showing X of Y schools" line, or `None` when there is nothing loaded.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.records.is_empty() {
            return None;
        }
        Some(format!(
            "Showing {} of {} schools",
            self.filtered().len(),
            self.total()
        ))
    }

    /// The empty state to show, if no records are visible.
    #[must_use]
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.records.is_empty() {
            Some(EmptyState::NoSchools)
        } else if self.filtered().is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }
}
