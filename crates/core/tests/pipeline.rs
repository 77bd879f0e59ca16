//! End-to-end checks of the pure pipeline: raw payload -> records ->
//! filtered/grouped views -> view models.

use grimoire_core::normalize::{normalize_characters, normalize_spells, IdScheme, RawDocument};
use grimoire_core::types::DEFAULT_IMAGE_PATH;
use grimoire_core::{
    filter_characters, filter_spells, group_by_category, to_view_model, CharacterRecord,
    DataStore, SortOrder, SpellRecord,
};

const DOCUMENT: &str = r#"{
    "characters": [
        {"name": "Harry Potter", "house": "Gryffindor", "image": "img/harry.png", "wizard": true},
        {"name": "Draco Malfoy", "house": "Slytherin", "image": "undefined"},
        {"name": "", "nameEn": "Luna Lovegood", "house": "Ravenclaw"},
        {"name": "Argus Filch", "image": "data:image/png;base64,AAAA"}
    ],
    "spells": {
        "combat": [{"name": "Stupefy", "description": "Stuns"}],
        "utility": [{"name": "Lumos", "description": "Light"}, {"name": "Accio", "description": "Summons"}],
        "defence": [{"name": "Protego", "description": "Shield"}]
    }
}"#;

fn load_document() -> DataStore {
    let doc: RawDocument = serde_json::from_str(DOCUMENT).unwrap();
    let characters = normalize_characters(
        doc.characters.as_deref().unwrap_or_default(),
        IdScheme::Positional,
        |rel| Some(format!("https://fans.example/data/{rel}")),
    );
    let spells = doc.spells.as_ref().map(normalize_spells).unwrap_or_default();

    let mut store = DataStore::new();
    store.replace(characters, spells);
    store
}

// ---------------------------------------------------------------------------
// Normalization through to view models
// ---------------------------------------------------------------------------

#[test]
fn document_normalizes_with_positional_ids_and_image_policy() {
    let store = load_document();
    let chars = store.characters();

    let ids: Vec<&str> = chars.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["char-0", "char-1", "char-2", "char-3"]);

    assert_eq!(chars[0].image_url, "https://fans.example/data/img/harry.png");
    assert_eq!(chars[1].image_url, DEFAULT_IMAGE_PATH);
    assert_eq!(chars[2].name, "Luna Lovegood");
    assert_eq!(chars[3].image_url, "data:image/png;base64,AAAA");
    assert_eq!(chars[3].house, "No house");
}

#[test]
fn details_view_joins_on_id() {
    let store = load_document();
    let record = store.find_character("char-0").unwrap();
    let view = to_view_model(record);

    assert_eq!(view.title, "Harry Potter");
    assert_eq!(view.house_slug, "gryffindor");
    assert!(view
        .detail_fields
        .iter()
        .any(|f| f.label == "Wizard" && f.value == "Yes"));
}

// ---------------------------------------------------------------------------
// Filter properties
// ---------------------------------------------------------------------------

#[test]
fn empty_filters_return_a_permutation() {
    let store = load_document();
    let result = filter_characters(store.characters(), "", "", Some(SortOrder::Descending));

    assert_eq!(result.len(), store.characters().len());
    for record in store.characters() {
        assert!(result.contains(record));
    }
}

#[test]
fn search_results_are_exactly_the_matching_names() {
    let store = load_document();
    for term in ["a", "LU", "potter", "zzz"] {
        let result = filter_characters(store.characters(), term, "", Some(SortOrder::Ascending));
        let expected = store
            .characters()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&term.to_lowercase()))
            .count();
        assert_eq!(result.len(), expected, "term {term}");
        assert!(result
            .iter()
            .all(|c| c.name.to_lowercase().contains(&term.to_lowercase())));
    }
}

#[test]
fn malfoy_scenario() {
    let list = vec![
        CharacterRecord::new("a", "Harry Potter", "Gryffindor"),
        CharacterRecord::new("b", "Draco Malfoy", "Slytherin"),
    ];
    let result = filter_characters(&list, "malfoy", "", Some(SortOrder::Ascending));
    assert_eq!(result, vec![list[1].clone()]);
}

#[test]
fn util_category_scenario() {
    let spells = vec![
        SpellRecord::new("Lumos", "", "utility"),
        SpellRecord::new("Incendio", "", "utility"),
    ];
    assert_eq!(filter_spells(&spells, "", "util"), spells);
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn grouping_keeps_document_category_order() {
    let store = load_document();
    let groups = group_by_category(store.spells());

    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["combat", "utility", "defence"]);
    let utility: Vec<&str> = groups["utility"].iter().map(|s| s.name.as_str()).collect();
    assert_eq!(utility, vec!["Lumos", "Accio"]);
}
