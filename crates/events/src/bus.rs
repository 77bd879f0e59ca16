//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the loader, the
//! session dispatcher, and whatever front end renders notifications.

use chrono::{DateTime, Utc};
use grimoire_core::CoreError;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// What went wrong, for styling and filtering on the UI side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Network failure or non-2xx response.
    Transport,
    /// Malformed payload or missing collection.
    Parse,
    /// A lookup by id found nothing.
    NotFound,
    /// Local persistence or validation problem.
    Other,
}

/// A user-facing message.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Short message suitable for an error dialog.
    pub message: String,
    /// Underlying error text, for logs and debug panels.
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Wrap a core error with the user-facing `message`.
    pub fn from_error(message: impl Into<String>, err: &CoreError) -> Self {
        let kind = match err {
            CoreError::Transport(_) => NotificationKind::Transport,
            CoreError::Parse(_) => NotificationKind::Parse,
            CoreError::NotFound { .. } => NotificationKind::NotFound,
            CoreError::Validation(_) | CoreError::Storage(_) => NotificationKind::Other,
        };
        Self::new(kind, message).with_detail(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// In-process fan-out bus.
///
/// # Usage
///
/// ```rust
/// use grimoire_events::bus::{EventBus, Notification, NotificationKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notification::new(NotificationKind::Transport, "Could not load characters"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<Notification>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest unread notifications are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification to all current subscribers.
    pub fn publish(&self, notification: Notification) {
        tracing::debug!(kind = ?notification.kind, message = %notification.message, "Publishing notification");
        // A send error only means nobody is listening.
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
