//! Normalized record types.
//!
//! Records are built once per load cycle by [`crate::normalize`] and are
//! never mutated afterwards; a reload replaces them wholesale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Record identifiers are opaque strings (`"char-3"`, a source UUID, or a
/// content-derived token).
pub type RecordId = String;

/// Default house label for characters without one.
pub const DEFAULT_HOUSE: &str = "No house";

/// Default name when neither language variant is present.
pub const DEFAULT_NAME: &str = "Unknown";

/// Default for date of birth and ancestry.
pub const DEFAULT_UNKNOWN: &str = "Unknown";

/// Default patronus label.
pub const DEFAULT_PATRONUS: &str = "None";

/// Asset served when a character has no usable image.
pub const DEFAULT_IMAGE_PATH: &str = "images/default-character.png";

// ---------------------------------------------------------------------------
// Detail fields
// ---------------------------------------------------------------------------

/// A label/value display pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

impl DetailField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// A normalized character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Unique within one loaded list; the join key for the details view.
    pub id: RecordId,
    pub name: String,
    pub house: String,
    pub image_url: String,
    pub date_of_birth: String,
    pub ancestry: String,
    pub patronus: String,
    /// Optional attributes that were present in the source, in display order.
    pub attributes: Vec<DetailField>,
    /// `attributes` rendered as `"Label: value"` pairs joined with `", "`.
    pub description: String,
}

impl CharacterRecord {
    /// Build a record with every optional field at its default.
    pub fn new(id: impl Into<String>, name: impl Into<String>, house: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            house: house.into(),
            image_url: DEFAULT_IMAGE_PATH.to_string(),
            date_of_birth: DEFAULT_UNKNOWN.to_string(),
            ancestry: DEFAULT_UNKNOWN.to_string(),
            patronus: DEFAULT_PATRONUS.to_string(),
            attributes: Vec::new(),
            description: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Spells
// ---------------------------------------------------------------------------

/// A normalized spell. `category` comes from the source document's
/// nesting key, never from a field of the spell object itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpellRecord {
    pub name: String,
    pub description: String,
    pub category: String,
}

impl SpellRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Name ordering for the character list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// The opposite order (the sort button flips between the two).
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// Label for the sort toggle button.
    pub fn button_label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "Sort A-Z",
            SortOrder::Descending => "Sort Z-A",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(CoreError::Validation(format!(
                "Unknown sort order: {other} (expected asc or desc)"
            ))),
        }
    }
}
