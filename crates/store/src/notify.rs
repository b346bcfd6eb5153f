use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use strum_macros::Display;
use tokio::sync::broadcast;

use crate::status::ErrorEntry;

pub const DEFAULT_DURATION_MS: u64 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Transient user-visible message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub duration_ms: u64,
}

/// Fan-out point for notifications. Cloning shares the channel; dropping a
/// receiver never blocks senders.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
    next_id: Arc<AtomicU64>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            message: message.into(),
            duration_ms: DEFAULT_DURATION_MS,
        };
        // Nobody listening is fine; the message is transient by contract.
        let _ = self.tx.send(notification.clone());
        notification
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationKind::Error, message)
    }
}

/// Turns store errors into notifications exactly once per occurrence.
///
/// Consumes by occurrence id, not by presence: observing the same stored
/// error any number of times produces one toast.
#[derive(Clone)]
pub struct ErrorRelay {
    notifier: Notifier,
    seen: Arc<Mutex<HashMap<&'static str, u64>>>,
}

impl ErrorRelay {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Observes a store's error field for `source` (one name per store) and
    /// notifies newly seen occurrences.
    pub fn observe(&self, source: &'static str, error: Option<&ErrorEntry>) {
        let Some(entry) = error else { return };
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let last = seen.entry(source).or_insert(0);
        if entry.occurrence <= *last {
            return;
        }
        *last = entry.occurrence;
        drop(seen);
        tracing::debug!(source, occurrence = entry.occurrence, "relaying store error");
        self.notifier.error(entry.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(occurrence: u64) -> ErrorEntry {
        ErrorEntry {
            occurrence,
            message: format!("failure {occurrence}"),
            not_found: false,
        }
    }

    #[test]
    fn each_occurrence_is_notified_once() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let relay = ErrorRelay::new(notifier);

        let first = entry(1);
        relay.observe("records", Some(&first));
        relay.observe("records", Some(&first));
        relay.observe("records", Some(&first));

        assert_eq!(rx.try_recv().unwrap().message, "failure 1");
        assert!(rx.try_recv().is_err(), "stale error must not re-notify");
    }

    #[test]
    fn sources_are_tracked_independently() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let relay = ErrorRelay::new(notifier);

        relay.observe("records", Some(&entry(1)));
        relay.observe("agenda", Some(&entry(1)));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn absent_errors_are_ignored() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let relay = ErrorRelay::new(notifier);
        relay.observe("records", None);
        assert!(rx.try_recv().is_err());
    }
}
