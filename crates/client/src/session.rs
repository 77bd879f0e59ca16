//! UI event dispatch.
//!
//! The front end turns user input into [`UiEvent`]s and hands them to
//! [`Session::dispatch`], which re-runs the pure pipeline against the
//! shared store and answers with a [`ViewUpdate`] to render. Nothing in
//! here knows how the update is drawn.

use std::sync::Arc;

use grimoire_core::grouping::SpellGroups;
use grimoire_core::types::RecordId;
use grimoire_core::{
    filter_characters, filter_spells, group_by_category, to_view_model, CharacterView, SortOrder,
};
use grimoire_events::Notification;

use crate::loader::Loader;

/// User-facing message when the details view cannot find its record.
const DETAILS_FAILED_MESSAGE: &str = "Could not load character details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SearchChanged(String),
    HouseFilterChanged(String),
    SortToggled,
    DetailsRequested(RecordId),
    SpellSearchChanged(String),
    SpellCategoryChanged(String),
    ReloadRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Re-render the character grid.
    Characters {
        items: Vec<CharacterView>,
        sort: SortOrder,
    },
    /// Open the details modal.
    Details(CharacterView),
    /// Re-render the spell accordion.
    Spells(SpellGroups),
    /// Nothing to redraw (e.g. a cancelled reload or a failed lookup).
    Unchanged,
}

/// Current filter inputs, as the controls show them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub house: String,
    pub sort: SortOrder,
    pub spell_search: String,
    pub spell_category: String,
}

pub struct Session {
    loader: Arc<Loader>,
    filters: FilterState,
}

impl Session {
    pub fn new(loader: Arc<Loader>) -> Self {
        Self {
            loader,
            filters: FilterState::default(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub async fn dispatch(&mut self, event: UiEvent) -> ViewUpdate {
        tracing::debug!(?event, "Dispatching UI event");
        match event {
            UiEvent::SearchChanged(search) => {
                self.filters.search = search;
                self.characters_view().await
            }
            UiEvent::HouseFilterChanged(house) => {
                self.filters.house = house;
                self.characters_view().await
            }
            UiEvent::SortToggled => {
                self.filters.sort = self.filters.sort.toggle();
                self.characters_view().await
            }
            UiEvent::DetailsRequested(id) => self.details_view(&id).await,
            UiEvent::SpellSearchChanged(search) => {
                self.filters.spell_search = search;
                self.spells_view().await
            }
            UiEvent::SpellCategoryChanged(category) => {
                self.filters.spell_category = category;
                self.spells_view().await
            }
            UiEvent::ReloadRequested => {
                if self.loader.load().await.is_cancelled() {
                    ViewUpdate::Unchanged
                } else {
                    self.characters_view().await
                }
            }
        }
    }

    /// The character grid under the current filters.
    pub async fn characters_view(&self) -> ViewUpdate {
        let store = self.loader.store().read().await;
        let items = filter_characters(
            store.characters(),
            &self.filters.search,
            &self.filters.house,
            Some(self.filters.sort),
        )
        .iter()
        .map(to_view_model)
        .collect();

        ViewUpdate::Characters {
            items,
            sort: self.filters.sort,
        }
    }

    /// The spell accordion under the current filters.
    pub async fn spells_view(&self) -> ViewUpdate {
        let store = self.loader.store().read().await;
        let filtered = filter_spells(
            store.spells(),
            &self.filters.spell_search,
            &self.filters.spell_category,
        );
        ViewUpdate::Spells(group_by_category(&filtered))
    }

    async fn details_view(&self, id: &str) -> ViewUpdate {
        let store = self.loader.store().read().await;
        match store.find_character(id) {
            Ok(record) => ViewUpdate::Details(to_view_model(record)),
            Err(err) => {
                tracing::warn!(id, error = %err, "Details requested for unknown character");
                self.loader
                    .bus()
                    .publish(Notification::from_error(DETAILS_FAILED_MESSAGE, &err));
                ViewUpdate::Unchanged
            }
        }
    }
}
