//! Grimoire notification bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`Notification`]: a user-visible message raised when a load or
//!   lookup fails. The UI layer subscribes and shows them; the data core
//!   never depends on how they are rendered.

pub mod bus;

pub use bus::{EventBus, Notification, NotificationKind};
