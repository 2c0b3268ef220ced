//! Bounded queue of user-facing notifications.
//!
//! The queue keeps at most [`MAX_NOTIFICATIONS`] entries and evicts the
//! oldest first. It holds no timer: the runtime learns about new entries via
//! [`NotificationQueue::take_fresh`] and dismisses each one exactly once.

use std::{collections::VecDeque, fmt};

use coword_proto::ServerError;

/// Maximum number of notifications held at once.
pub const MAX_NOTIFICATIONS: usize = 3;

/// Monotonically increasing notification token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Raw token value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a notification says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationPayload {
    /// Locally generated text.
    Message(String),
    /// Error declared by the server, forwarded verbatim.
    ServerError(ServerError),
}

impl NotificationPayload {
    /// Build a text payload.
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// Text to show the user.
    pub fn text(&self) -> &str {
        match self {
            Self::Message(text) => text,
            Self::ServerError(err) => &err.message,
        }
    }
}

/// One queued notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Token used to dismiss this entry.
    pub id: NotificationId,
    /// Content.
    pub payload: NotificationPayload,
}

/// Bounded FIFO of notifications.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    /// Ids enqueued since the last `take_fresh`.
    fresh: Vec<NotificationId>,
    next_id: u64,
}

impl NotificationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and evict from the head past the bound.
    pub fn enqueue(&mut self, payload: NotificationPayload) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);

        tracing::debug!(%id, text = payload.text(), "notification raised");
        self.entries.push_back(Notification { id, payload });
        self.fresh.push(id);

        while self.entries.len() > MAX_NOTIFICATIONS {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(id = %evicted.id, "notification evicted");
            }
        }

        id
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        before != self.entries.len()
    }

    /// Ids enqueued since the previous call, oldest first.
    ///
    /// Includes ids that were already evicted, so that every enqueued
    /// notification receives exactly one dismiss signal.
    pub fn take_fresh(&mut self) -> Vec<NotificationId> {
        std::mem::take(&mut self.fresh)
    }

    /// Current notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
