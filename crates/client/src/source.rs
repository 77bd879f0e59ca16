//! Data source adapters.
//!
//! A [`RecordSource`] fetches one snapshot of raw data and normalizes it.
//! Two implementations exist: [`RemoteSource`] (the public API for
//! characters, plus spells from the static document when one is set) and [`StaticSource`] (the bundled JSON document with characters
//! and category-nested spells). The loader owns cancellation and caching;
//! sources only fetch and map.

use async_trait::async_trait;
use grimoire_core::normalize::{
    is_featured, normalize_characters, normalize_spells, IdScheme, RawCharacter, RawDocument,
};
use grimoire_core::{CharacterRecord, CoreError, SpellRecord};
use reqwest::Url;

use crate::api::ApiClient;

/// Top-level key of the character collection.
pub const CHARACTERS_KEY: &str = "characters";

/// Top-level key of the spell mapping.
pub const SPELLS_KEY: &str = "spells";

/// One normalized snapshot from a source.
#[derive(Debug, Clone, Default)]
pub struct SourcePayload {
    pub characters: Vec<CharacterRecord>,
    pub spells: Vec<SpellRecord>,
    /// Expected top-level collections that were absent from the payload.
    pub missing: Vec<&'static str>,
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short label for logs (`"remote"`, `"static"`).
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<SourcePayload, CoreError>;
}

/// Join a relative image path onto `base`, if it parses.
fn resolver(base: &Url) -> impl Fn(&str) -> Option<String> + '_ {
    move |relative: &str| base.join(relative).ok().map(|u| u.to_string())
}

/// Parse a base URL, adding the trailing slash `Url::join` needs to treat
/// the last segment as a directory.
fn directory_url(raw: &str) -> Result<Url, CoreError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|e| CoreError::Validation(format!("Invalid base URL {raw}: {e}")))
}

// ---------------------------------------------------------------------------
// Remote API
// ---------------------------------------------------------------------------

pub struct RemoteSource {
    api: ApiClient,
    base: Url,
    featured_only: bool,
    /// Static document to take spells from; the API has none.
    spells: Option<StaticSource>,
}

impl RemoteSource {
    pub fn new(api: ApiClient, featured_only: bool) -> Result<Self, CoreError> {
        let base = directory_url(api.api_url())?;
        Ok(Self {
            api,
            base,
            featured_only,
            spells: None,
        })
    }

    /// Read spells from `document` on every fetch.
    pub fn with_spells(mut self, document: StaticSource) -> Self {
        self.spells = Some(document);
        self
    }

    /// Spells from the companion document, or `None` when there is no
    /// document or it lacks the spell mapping.
    async fn fetch_spells(&self) -> Result<Option<Vec<SpellRecord>>, CoreError> {
        let Some(document) = &self.spells else {
            return Ok(None);
        };
        let doc: RawDocument = serde_json::from_str(&document.read_body().await?)?;
        Ok(doc.spells.as_ref().map(normalize_spells))
    }
}

/// Pull the character array out of a response body.
///
/// The API answers with a bare array; an object wrapping the array under
/// `characters` is accepted too. Anything else is a missing collection.
fn extract_characters(body: serde_json::Value) -> Result<Option<Vec<RawCharacter>>, CoreError> {
    let list = match body {
        serde_json::Value::Array(items) => serde_json::Value::Array(items),
        serde_json::Value::Object(mut map) => match map.remove(CHARACTERS_KEY) {
            Some(list) => list,
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(serde_json::from_value(list)?))
}

#[async_trait]
impl RecordSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self) -> Result<SourcePayload, CoreError> {
        let body = self.api.get_characters().await?;

        let Some(raw) = extract_characters(body)? else {
            return Ok(SourcePayload {
                missing: vec![CHARACTERS_KEY],
                ..Default::default()
            });
        };

        let raw: Vec<RawCharacter> = if self.featured_only {
            raw.into_iter().filter(is_featured).collect()
        } else {
            raw
        };

        let characters = normalize_characters(&raw, IdScheme::ContentHash, resolver(&self.base));
        tracing::info!(count = characters.len(), featured_only = self.featured_only, "Fetched characters from API");

        let mut missing = Vec::new();
        let spells = match self.fetch_spells().await? {
            Some(spells) => spells,
            None => {
                missing.push(SPELLS_KEY);
                Vec::new()
            }
        };

        Ok(SourcePayload {
            characters,
            spells,
            missing,
        })
    }
}

// ---------------------------------------------------------------------------
// Static document
// ---------------------------------------------------------------------------

/// The bundled document, at an `http(s)://` or `file://` location.
pub struct StaticSource {
    api: ApiClient,
    location: Url,
}

impl StaticSource {
    pub fn new(api: ApiClient, location: Url) -> Self {
        Self { api, location }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    async fn read_body(&self) -> Result<String, CoreError> {
        if self.location.scheme() == "file" {
            let path = self
                .location
                .to_file_path()
                .map_err(|_| CoreError::Validation(format!("Not a local path: {}", self.location)))?;
            return tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| CoreError::Transport(format!("{}: {e}", path.display())));
        }
        Ok(self.api.get_text(&self.location).await?)
    }
}

/// Normalize a parsed document. Relative image paths resolve against
/// `location` itself (the document's own URL).
pub fn payload_from_document(doc: RawDocument, location: &Url) -> SourcePayload {
    let mut missing = Vec::new();

    let characters = match doc.characters {
        Some(raw) => normalize_characters(&raw, IdScheme::Positional, resolver(location)),
        None => {
            missing.push(CHARACTERS_KEY);
            Vec::new()
        }
    };

    let spells = match doc.spells {
        Some(raw) => normalize_spells(&raw),
        None => {
            missing.push(SPELLS_KEY);
            Vec::new()
        }
    };

    SourcePayload {
        characters,
        spells,
        missing,
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> Result<SourcePayload, CoreError> {
        let body = self.read_body().await?;
        let doc: RawDocument = serde_json::from_str(&body)?;
        let payload = payload_from_document(doc, &self.location);

        tracing::info!(
            location = %self.location,
            characters = payload.characters.len(),
            spells = payload.spells.len(),
            "Loaded static document",
        );
        Ok(payload)
    }
}
