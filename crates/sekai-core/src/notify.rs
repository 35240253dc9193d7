//! User-facing notifications emitted by the cache manager.
//!
//! The manager reports load failures through a [`NotificationSink`] instead
//! of returning errors. Hosts decide how to present them.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// A dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Not kept once dismissed.
    pub transient: bool,
}

impl Notification {
    pub const LOAD_ERROR_TITLE: &'static str = "Repository Load Error";

    /// Notification for a repository that failed to load.
    pub fn load_failure(repository_name: &str, reason: &dyn std::fmt::Display) -> Self {
        Self {
            title: Self::LOAD_ERROR_TITLE.to_string(),
            body: format!(
                "Failed to load repository \"{}\": {}",
                repository_name, reason
            ),
            transient: true,
        }
    }
}

/// Receiver for manager notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Shared handle to a notification sink.
pub type DynNotificationSink = Arc<dyn NotificationSink>;

/// Sink that only writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notification: Notification) {
        warn!("{}: {}", notification.title, notification.body);
    }
}

/// Sink that queues notifications until a host drains them.
#[derive(Debug, Default)]
pub struct QueueNotifier {
    queue: Mutex<Vec<Notification>>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for QueueNotifier {
    fn notify(&self, notification: Notification) {
        warn!("{}: {}", notification.title, notification.body);
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failure_notification() {
        let n = Notification::load_failure("Alpha", &"HTTP 404");
        assert_eq!(n.title, "Repository Load Error");
        assert_eq!(n.body, "Failed to load repository \"Alpha\": HTTP 404");
        assert!(n.transient);
    }

    #[test]
    fn test_queue_drain() {
        let queue = QueueNotifier::new();
        assert!(queue.is_empty());

        queue.notify(Notification::load_failure("A", &"x"));
        queue.notify(Notification::load_failure("B", &"y"));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained[0].body.contains("\"A\""));
        assert!(queue.is_empty());
    }
}
