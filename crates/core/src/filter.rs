//! Filter/sort engine.
//!
//! Pure functions over borrowed slices: inputs are never mutated, and the
//! result is a fresh `Vec` of clones. Safe to call on every keystroke.

use std::cmp::Ordering;

use crate::types::{CharacterRecord, SortOrder, SpellRecord};

/// Case-insensitive substring match. An empty needle matches everything.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive exact match. An empty filter matches everything.
fn equals_ci(value: &str, filter: &str) -> bool {
    filter.is_empty() || value.to_lowercase() == filter.to_lowercase()
}

/// Case-folded comparison with the raw string as tie-break, so names that
/// differ only in case still have a total, deterministic order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Narrow characters by name substring and exact house, then order by name.
///
/// `sort == None` keeps the input order.
pub fn filter_characters(
    characters: &[CharacterRecord],
    search: &str,
    house: &str,
    sort: Option<SortOrder>,
) -> Vec<CharacterRecord> {
    let mut matched: Vec<CharacterRecord> = characters
        .iter()
        .filter(|c| contains_ci(&c.name, search) && equals_ci(&c.house, house))
        .cloned()
        .collect();

    match sort {
        Some(SortOrder::Ascending) => matched.sort_by(|a, b| compare_names(&a.name, &b.name)),
        Some(SortOrder::Descending) => matched.sort_by(|a, b| compare_names(&b.name, &a.name)),
        None => {}
    }

    matched
}

/// Narrow spells by name substring and category substring. No sorting.
pub fn filter_spells(spells: &[SpellRecord], search: &str, category: &str) -> Vec<SpellRecord> {
    spells
        .iter()
        .filter(|s| contains_ci(&s.name, search) && contains_ci(&s.category, category))
        .cloned()
        .collect()
}
