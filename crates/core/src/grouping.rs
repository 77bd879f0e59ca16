//! Spell grouping for the accordion view.

use indexmap::IndexMap;

use crate::types::SpellRecord;

/// Spells keyed by category, in first-seen category order.
pub type SpellGroups = IndexMap<String, Vec<SpellRecord>>;

/// Partition spells by category.
///
/// Category keys keep the order in which they first appear in `spells`,
/// and each group keeps the input's relative order.
pub fn group_by_category(spells: &[SpellRecord]) -> SpellGroups {
    let mut groups = SpellGroups::new();
    for spell in spells {
        groups
            .entry(spell.category.clone())
            .or_default()
            .push(spell.clone());
    }
    groups
}
