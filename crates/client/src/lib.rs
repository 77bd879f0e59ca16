//! Grimoire client: everything that touches the network or the disk.
//!
//! Provides the remote/static data source adapters, the cancellable
//! [`Loader`] that fills the shared [`DataStore`](grimoire_core::DataStore),
//! the quiz question fetcher, the local key/value store, the UI event
//! [`Session`], and environment configuration.

pub mod api;
pub mod config;
pub mod loader;
pub mod local_store;
pub mod quiz;
pub mod session;
pub mod source;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, SourceKind};
pub use loader::{LoadOutcome, Loader, PendingLoad, RequestHandle};
pub use local_store::{LocalStore, StoreError};
pub use quiz::QuizClient;
pub use session::{FilterState, Session, UiEvent, ViewUpdate};
pub use source::{RecordSource, RemoteSource, SourcePayload, StaticSource};
