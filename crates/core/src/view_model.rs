//! Presentation bridge: records to render-ready view models.

use serde::Serialize;

use crate::types::{CharacterRecord, DetailField, RecordId};

/// Everything a character card or details modal needs, already formatted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterView {
    pub id: RecordId,
    pub title: String,
    pub subtitle: String,
    /// House as a CSS class hook, e.g. `"no-house"`.
    pub house_slug: String,
    pub image_url: String,
    pub detail_fields: Vec<DetailField>,
}

/// Lowercase, with each whitespace run collapsed to a single `-`.
pub fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Project a character into its view model.
///
/// Date of birth, ancestry, and patronus always lead (they carry defaults);
/// optional attributes follow only when the source provided them.
pub fn to_view_model(record: &CharacterRecord) -> CharacterView {
    let mut detail_fields = Vec::with_capacity(3 + record.attributes.len());
    detail_fields.push(DetailField::new("Date of birth", record.date_of_birth.clone()));
    detail_fields.push(DetailField::new("Ancestry", record.ancestry.clone()));
    detail_fields.push(DetailField::new("Patronus", record.patronus.clone()));
    detail_fields.extend(record.attributes.iter().cloned());

    CharacterView {
        id: record.id.clone(),
        title: record.name.clone(),
        subtitle: record.house.clone(),
        house_slug: slugify(&record.house),
        image_url: record.image_url.clone(),
        detail_fields,
    }
}
