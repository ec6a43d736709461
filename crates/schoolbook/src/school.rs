//! Core school types for schoolbook.
//!
//! This module defines the persisted [`SchoolRecord`] and the raw
//! [`SchoolInput`] captured from the add-school form.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A registered school.
///
/// The serialized field names are the persisted wire format and must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    /// Unique identifier, derived from the creation timestamp in milliseconds.
    pub id: i64,
    /// School name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Ten-digit contact number.
    pub contact: String,
    /// Contact email address.
    pub email_id: String,
    /// Data-URL of the uploaded image, or a placeholder path.
    pub image: String,
}

impl SchoolRecord {
    /// Check whether the image is an embedded data-URL rather than a path.
    #[must_use]
    pub fn has_embedded_image(&self) -> bool {
        self.image.starts_with("data:")
    }

    /// The "City, State" line shown under the address.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    /// Case-insensitive substring match over name, city and state.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.name, &self.city, &self.state]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Raw, unvalidated input from the add-school form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolInput {
    /// School name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Contact number.
    pub contact: String,
    /// Contact email address.
    pub email_id: String,
    /// Selected image file, if any.
    pub image: Option<PathBuf>,
}

impl SchoolInput {
    /// Check whether every text field is empty and no image is selected.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.address.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.contact.is_empty()
            && self.email_id.is_empty()
            && self.image.is_none()
    }
}

/// Allocate an id for a new record.
///
/// Ids are milliseconds since the Unix epoch, bumped past the largest id
/// already in `existing` so that they stay unique and increasing even when
/// two records land in the same millisecond.
#[must_use]
pub fn next_id(existing: &[SchoolRecord]) -> i64 {
    next_id_at(existing, Utc::now().timestamp_millis())
}

/// Allocate an id as if the clock read `now_millis`.
#[must_use]
pub fn next_id_at(existing: &[SchoolRecord], now_millis: i64) -> i64 {
    match existing.iter().map(|r| r.id).max() {
        Some(last) if last >= now_millis => last.saturating_add(1),
        _ => now_millis,
    }
}
