//! Pure data core for the grimoire fan site.
//!
//! Everything in this crate is free of I/O: record types, the
//! normalization policy applied to raw source payloads, the filter/sort
//! engine, spell grouping, view-model projection, and the small pieces of
//! quiz, contact-form, and theme logic the UI layer needs. The client
//! crate feeds it data; the UI layer only ever consumes its outputs.

pub mod contact;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod normalize;
pub mod quiz;
pub mod store;
pub mod theme;
pub mod types;
pub mod view_model;

pub use error::CoreError;
pub use filter::{filter_characters, filter_spells};
pub use grouping::group_by_category;
pub use store::DataStore;
pub use types::{CharacterRecord, DetailField, SortOrder, SpellRecord};
pub use view_model::{to_view_model, CharacterView};
