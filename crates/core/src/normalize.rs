//! Raw source payloads and the normalization policy that maps them onto
//! [`CharacterRecord`] / [`SpellRecord`].
//!
//! Both the remote API and the static document use the same raw character
//! shape; the static document additionally nests spells under category
//! keys. Empty strings in the source are treated exactly like missing
//! fields.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::types::{
    CharacterRecord, DetailField, SpellRecord, DEFAULT_HOUSE, DEFAULT_IMAGE_PATH, DEFAULT_NAME,
    DEFAULT_PATRONUS, DEFAULT_UNKNOWN,
};

/// Marker that some sources leave in image fields when the value was
/// stringified from a missing variable.
const UNDEFINED_MARKER: &str = "undefined";

/// Number of base-36 digits in a content-derived id.
const CONTENT_ID_LEN: usize = 9;

/// Default spell description when the source omits it.
pub const DEFAULT_SPELL_DESCRIPTION: &str = "No description available";

/// Main cast shown when the featured-only roster is enabled.
pub const FEATURED_CHARACTERS: &[&str] = &[
    "Harry Potter",
    "Ron Weasley",
    "Hermione Granger",
    "Draco Malfoy",
    "Albus Dumbledore",
    "Severus Snape",
    "Minerva McGonagall",
    "Rubeus Hagrid",
    "Sirius Black",
    "Remus Lupin",
    "Bellatrix Lestrange",
    "Lord Voldemort",
    "Neville Longbottom",
    "Luna Lovegood",
    "Ginny Weasley",
    "Dobby",
    "Fred Weasley",
    "George Weasley",
    "Arthur Weasley",
    "Molly Weasley",
];

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

/// A character exactly as the source delivers it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacter {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Alternate-language name, used when `name` is empty.
    #[serde(alias = "name_en")]
    pub name_en: Option<String>,
    pub house: Option<String>,
    pub image: Option<String>,
    pub picture: Option<String>,
    pub date_of_birth: Option<String>,
    pub birthday: Option<String>,
    pub ancestry: Option<String>,
    pub patronus: Option<String>,
    pub gender: Option<String>,
    pub species: Option<String>,
    pub wand: Option<RawWand>,
    pub wizard: Option<bool>,
    pub hogwarts_student: Option<bool>,
    pub hogwarts_staff: Option<bool>,
    pub alive: Option<bool>,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWand {
    pub wood: Option<String>,
    pub core: Option<String>,
    /// Numeric inches in the API, occasionally a free-form string.
    pub length: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpell {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// The bundled static document. Either collection may be missing; the
/// loader reports that separately from a malformed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    pub characters: Option<Vec<RawCharacter>>,
    pub spells: Option<IndexMap<String, Vec<RawSpell>>>,
}

/// How ids are synthesized for characters the source did not give one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// `"char-{index}"`, used for the static document.
    Positional,
    /// Base-36 digest of the name, used for the remote API.
    ContentHash,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Trimmed value if present and non-empty.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_present<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<&'a str> {
    present(a).or_else(|| present(b))
}

fn or_default(value: Option<&str>, default: &str) -> String {
    present(value).unwrap_or(default).to_string()
}

/// Render a boolean-like source field as its display string.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Whether `s` starts with a URI scheme (`ALPHA *(ALPHA / DIGIT / "+" / "-" / ".") ":"`).
pub fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Apply the image policy.
///
/// Absolute URLs and data URIs pass through. Relative paths go through
/// `resolve_relative` (which joins them onto the source's base location);
/// a resolver that cannot join falls back to the path as given. Missing
/// values and values containing the `"undefined"` marker become
/// [`DEFAULT_IMAGE_PATH`].
pub fn resolve_image_url<F>(raw: Option<&str>, resolve_relative: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = present(raw) else {
        return DEFAULT_IMAGE_PATH.to_string();
    };
    if value.contains(UNDEFINED_MARKER) {
        return DEFAULT_IMAGE_PATH.to_string();
    }
    if has_scheme(value) {
        return value.to_string();
    }
    resolve_relative(value).unwrap_or_else(|| value.to_string())
}

fn wand_display(wand: &RawWand) -> Option<String> {
    let length = match &wand.length {
        Some(serde_json::Value::Number(n)) => Some(format!("{n} in")),
        Some(serde_json::Value::String(s)) => present(Some(s.as_str())).map(str::to_string),
        _ => None,
    };
    let parts: Vec<String> = [
        present(wand.wood.as_deref()).map(str::to_string),
        present(wand.core.as_deref()).map(str::to_string),
        length,
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Collect the optional attributes that are present, in display order.
fn attributes(raw: &RawCharacter) -> Vec<DetailField> {
    let mut fields = Vec::new();

    if let Some(gender) = present(raw.gender.as_deref()) {
        fields.push(DetailField::new("Gender", gender));
    }
    if let Some(species) = present(raw.species.as_deref()) {
        fields.push(DetailField::new("Species", species));
    }
    if let Some(wand) = raw.wand.as_ref().and_then(wand_display) {
        fields.push(DetailField::new("Wand", wand));
    }
    if let Some(wizard) = raw.wizard {
        fields.push(DetailField::new("Wizard", yes_no(wizard)));
    }
    if let Some(student) = raw.hogwarts_student {
        fields.push(DetailField::new("Hogwarts student", yes_no(student)));
    }
    if let Some(staff) = raw.hogwarts_staff {
        fields.push(DetailField::new("Hogwarts staff", yes_no(staff)));
    }
    if let Some(alive) = raw.alive {
        fields.push(DetailField::new("Alive", yes_no(alive)));
    }
    if let Some(actor) = present(raw.actor.as_deref()) {
        fields.push(DetailField::new("Actor", actor));
    }

    fields
}

/// Join attributes into the free-text description.
pub fn describe(attributes: &[DetailField]) -> String {
    attributes
        .iter()
        .map(|f| format!("{}: {}", f.label, f.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deterministic base-36 token derived from the character's name.
pub fn content_id(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let mut n = u64::from_be_bytes(bytes);

    let mut digits = Vec::with_capacity(13);
    loop {
        let d = (n % 36) as u32;
        digits.push(std::char::from_digit(d, 36).unwrap_or('0'));
        n /= 36;
        if n == 0 {
            break;
        }
    }
    digits.iter().rev().take(CONTENT_ID_LEN).collect()
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Whether the raw character belongs to the featured roster and has an image.
pub fn is_featured(raw: &RawCharacter) -> bool {
    let has_image = first_present(raw.image.as_deref(), raw.picture.as_deref()).is_some();
    let is_main = present(raw.name.as_deref())
        .map(|name| FEATURED_CHARACTERS.contains(&name))
        .unwrap_or(false);
    is_main && has_image
}

/// Normalize one character. `fallback_id` is used only when the source
/// carries no id of its own.
pub fn normalize_character<F>(raw: &RawCharacter, fallback_id: String, resolve_relative: F) -> CharacterRecord
where
    F: Fn(&str) -> Option<String>,
{
    let attributes = attributes(raw);
    let description = describe(&attributes);

    CharacterRecord {
        id: present(raw.id.as_deref())
            .map(str::to_string)
            .unwrap_or(fallback_id),
        name: first_present(raw.name.as_deref(), raw.name_en.as_deref())
            .unwrap_or(DEFAULT_NAME)
            .to_string(),
        house: or_default(raw.house.as_deref(), DEFAULT_HOUSE),
        image_url: resolve_image_url(
            first_present(raw.image.as_deref(), raw.picture.as_deref()),
            resolve_relative,
        ),
        date_of_birth: first_present(raw.date_of_birth.as_deref(), raw.birthday.as_deref())
            .unwrap_or(DEFAULT_UNKNOWN)
            .to_string(),
        ancestry: or_default(raw.ancestry.as_deref(), DEFAULT_UNKNOWN),
        patronus: or_default(raw.patronus.as_deref(), DEFAULT_PATRONUS),
        attributes,
        description,
    }
}

/// Normalize a whole character list, synthesizing ids per `scheme` and
/// suffixing duplicates so every id in the result is unique.
pub fn normalize_characters<F>(raw: &[RawCharacter], scheme: IdScheme, resolve_relative: F) -> Vec<CharacterRecord>
where
    F: Fn(&str) -> Option<String>,
{
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());

    raw.iter()
        .enumerate()
        .map(|(index, character)| {
            let fallback = match scheme {
                IdScheme::Positional => format!("char-{index}"),
                IdScheme::ContentHash => content_id(
                    first_present(character.name.as_deref(), character.name_en.as_deref())
                        .unwrap_or(DEFAULT_NAME),
                ),
            };
            let mut record = normalize_character(character, fallback, &resolve_relative);
            record.id = unique_id(&mut seen, record.id);
            record
        })
        .collect()
}

fn unique_id(seen: &mut HashSet<String>, id: String) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{id}-{n}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Flatten the category-nested spell mapping, keeping document order.
pub fn normalize_spells(raw: &IndexMap<String, Vec<RawSpell>>) -> Vec<SpellRecord> {
    raw.iter()
        .flat_map(|(category, spells)| {
            spells.iter().map(move |spell| SpellRecord {
                name: or_default(spell.name.as_deref(), DEFAULT_NAME),
                description: or_default(spell.description.as_deref(), DEFAULT_SPELL_DESCRIPTION),
                category: category.clone(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn no_base(_: &str) -> Option<String> {
        None
    }

    fn raw(name: &str) -> RawCharacter {
        RawCharacter {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    // -- image policy --------------------------------------------------------

    #[test]
    fn missing_image_uses_default_asset() {
        assert_eq!(resolve_image_url(None, no_base), DEFAULT_IMAGE_PATH);
        assert_eq!(resolve_image_url(Some("  "), no_base), DEFAULT_IMAGE_PATH);
    }

    #[test]
    fn undefined_marker_uses_default_asset() {
        assert_eq!(
            resolve_image_url(Some("images/undefined.jpg"), no_base),
            DEFAULT_IMAGE_PATH
        );
    }

    #[test]
    fn absolute_and_data_uris_pass_through() {
        let abs = "https://ik.imagekit.io/hpapi/harry.jpg";
        assert_eq!(resolve_image_url(Some(abs), |_| Some("x".into())), abs);
        let data = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(resolve_image_url(Some(data), |_| Some("x".into())), data);
    }

    #[test]
    fn relative_image_goes_through_resolver() {
        let resolved = resolve_image_url(Some("img/luna.png"), |rel| {
            Some(format!("https://example.org/data/{rel}"))
        });
        assert_eq!(resolved, "https://example.org/data/img/luna.png");
    }

    #[test]
    fn has_scheme_rejects_plain_paths() {
        assert!(has_scheme("http://x"));
        assert!(has_scheme("data:,hi"));
        assert!(!has_scheme("img/a.png"));
        assert!(!has_scheme("/abs/path.png"));
        assert!(!has_scheme("1http://x"));
    }

    // -- character mapping ---------------------------------------------------

    #[test]
    fn name_falls_back_to_alternate_then_default() {
        let mut c = RawCharacter {
            name: Some(String::new()),
            name_en: Some("Harry Potter".into()),
            ..Default::default()
        };
        assert_eq!(normalize_character(&c, "x".into(), no_base).name, "Harry Potter");

        c.name_en = None;
        assert_eq!(normalize_character(&c, "x".into(), no_base).name, DEFAULT_NAME);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let record = normalize_character(&raw("Dobby"), "char-0".into(), no_base);
        assert_eq!(record.house, DEFAULT_HOUSE);
        assert_eq!(record.date_of_birth, DEFAULT_UNKNOWN);
        assert_eq!(record.ancestry, DEFAULT_UNKNOWN);
        assert_eq!(record.patronus, DEFAULT_PATRONUS);
        assert_eq!(record.image_url, DEFAULT_IMAGE_PATH);
        assert!(record.description.is_empty());
    }

    #[test]
    fn booleans_render_as_yes_no() {
        let c = RawCharacter {
            wizard: Some(true),
            alive: Some(false),
            ..raw("Sirius Black")
        };
        let record = normalize_character(&c, "x".into(), no_base);
        assert_eq!(
            record.attributes,
            vec![DetailField::new("Wizard", "Yes"), DetailField::new("Alive", "No")]
        );
        assert_eq!(record.description, "Wizard: Yes, Alive: No");
    }

    #[test]
    fn birthday_is_alternate_date_field() {
        let c = RawCharacter {
            birthday: Some("31-07-1980".into()),
            ..raw("Harry Potter")
        };
        assert_eq!(
            normalize_character(&c, "x".into(), no_base).date_of_birth,
            "31-07-1980"
        );
    }

    #[test]
    fn wand_joins_present_parts() {
        let c = RawCharacter {
            wand: Some(RawWand {
                wood: Some("holly".into()),
                core: Some("phoenix tail feather".into()),
                length: Some(serde_json::json!(11)),
            }),
            ..raw("Harry Potter")
        };
        let record = normalize_character(&c, "x".into(), no_base);
        assert_eq!(
            record.attributes,
            vec![DetailField::new("Wand", "holly, phoenix tail feather, 11 in")]
        );
    }

    #[test]
    fn empty_wand_is_omitted() {
        let c = RawCharacter {
            wand: Some(RawWand {
                wood: Some(String::new()),
                core: None,
                length: Some(serde_json::Value::Null),
            }),
            ..raw("Argus Filch")
        };
        assert!(normalize_character(&c, "x".into(), no_base).attributes.is_empty());
    }

    #[test]
    fn api_payload_deserializes() {
        let json = r#"{
            "id": "9e3f7ce4-b9a7-4244-b709-dae5c1f1d4a8",
            "name": "Harry Potter",
            "house": "Gryffindor",
            "dateOfBirth": "31-07-1980",
            "hogwartsStudent": true,
            "hogwartsStaff": false,
            "wand": {"wood": "holly", "core": "phoenix tail feather", "length": 11},
            "image": "https://ik.imagekit.io/hpapi/harry.jpg"
        }"#;
        let c: RawCharacter = serde_json::from_str(json).unwrap();
        let record = normalize_character(&c, "unused".into(), no_base);
        assert_eq!(record.id, "9e3f7ce4-b9a7-4244-b709-dae5c1f1d4a8");
        assert_eq!(record.date_of_birth, "31-07-1980");
        assert_eq!(record.attributes.len(), 3);
    }

    // -- ids -----------------------------------------------------------------

    #[test]
    fn positional_ids_follow_index() {
        let list = vec![raw("A"), raw("B")];
        let records = normalize_characters(&list, IdScheme::Positional, no_base);
        assert_eq!(records[0].id, "char-0");
        assert_eq!(records[1].id, "char-1");
    }

    #[test]
    fn content_ids_are_stable_and_base36() {
        let a = content_id("Luna Lovegood");
        assert_eq!(a, content_id("Luna Lovegood"));
        assert_ne!(a, content_id("Ginny Weasley"));
        assert!(a.len() <= CONTENT_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn duplicate_ids_are_suffixed() {
        let list = vec![raw("Fred Weasley"), raw("Fred Weasley"), raw("Fred Weasley")];
        let records = normalize_characters(&list, IdScheme::ContentHash, no_base);
        let base = content_id("Fred Weasley");
        assert_eq!(records[0].id, base);
        assert_eq!(records[1].id, format!("{base}-2"));
        assert_eq!(records[2].id, format!("{base}-3"));
    }

    // -- featured roster -----------------------------------------------------

    #[test]
    fn featured_requires_main_cast_and_image() {
        let with_image = RawCharacter {
            picture: Some("p.png".into()),
            ..raw("Dobby")
        };
        assert!(is_featured(&with_image));
        assert!(!is_featured(&raw("Dobby")));
        let minor = RawCharacter {
            image: Some("x.png".into()),
            ..raw("Argus Filch")
        };
        assert!(!is_featured(&minor));
    }

    // -- spells --------------------------------------------------------------

    #[test]
    fn spells_take_category_from_nesting_key() {
        let doc: RawDocument = serde_json::from_str(
            r#"{"spells": {
                "utility": [{"name": "Lumos", "description": "Light"}],
                "combat": [{"name": "Stupefy"}]
            }}"#,
        )
        .unwrap();
        let spells = normalize_spells(doc.spells.as_ref().unwrap());
        assert_eq!(spells.len(), 2);
        assert_eq!(spells[0], SpellRecord::new("Lumos", "Light", "utility"));
        assert_eq!(spells[1].category, "combat");
        assert_eq!(spells[1].description, DEFAULT_SPELL_DESCRIPTION);
        assert!(doc.characters.is_none());
    }
}
