//! The owned record cache.
//!
//! One `DataStore` holds the lists from the most recent successful load.
//! It is replaced wholesale; there is no incremental refresh. Callers that
//! share it across tasks wrap it in `Arc<RwLock<DataStore>>`.

use crate::error::CoreError;
use crate::types::{CharacterRecord, SpellRecord};

#[derive(Debug, Clone, Default)]
pub struct DataStore {
    characters: Vec<CharacterRecord>,
    spells: Vec<SpellRecord>,
    /// Incremented on every `replace`; lets readers detect a reload.
    revision: u64,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly loaded snapshot.
    pub fn replace(&mut self, characters: Vec<CharacterRecord>, spells: Vec<SpellRecord>) {
        self.characters = characters;
        self.spells = spells;
        self.revision += 1;
    }

    pub fn characters(&self) -> &[CharacterRecord] {
        &self.characters
    }

    pub fn spells(&self) -> &[SpellRecord] {
        &self.spells
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.spells.is_empty()
    }

    /// Look up a character by id for the details view.
    pub fn find_character(&self, id: &str) -> Result<&CharacterRecord, CoreError> {
        self.characters
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "character",
                id: id.to_string(),
            })
    }
}
