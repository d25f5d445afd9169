//! # Notification Emission
//!
//! The engine's boundary to the presentation layer. Core components call
//! [`NotificationSink::emit`] and never read notification state back.
//!
//! Expiry is data, not behavior: each record carries an explicit
//! `expires_at` timestamp and the presentation layer polls
//! [`NotificationHub::active`] — there are no timers in the core.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use fm_core::NotificationId;

/// Presentation category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient user-facing event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// After this instant the record is no longer shown.
    pub expires_at: DateTime<Utc>,
}

/// Capability the engine depends on to surface events.
///
/// Implementations must be infallible from the caller's perspective: a
/// failed or dropped notification must never fail the command that
/// produced it.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, kind: NotificationKind, title: &str, message: &str) -> NotificationId;
}

/// In-memory hub retaining emitted notifications until they expire.
pub struct NotificationHub {
    entries: DashMap<NotificationId, Notification>,
    lifetime: Duration,
}

impl NotificationHub {
    /// Display lifetime applied to every emitted record.
    pub const DEFAULT_LIFETIME_SECS: i64 = 5;

    pub fn new() -> Self {
        Self::with_lifetime(Duration::seconds(Self::DEFAULT_LIFETIME_SECS))
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            lifetime,
        }
    }

    /// Records not yet expired at `now`, oldest first.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut out: Vec<Notification> = self
            .entries
            .iter()
            .filter(|entry| entry.value().expires_at > now)
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by_key(|n| (n.created_at, *n.id.as_uuid()));
        out
    }

    /// Every retained record, expired or not, oldest first.
    pub fn all(&self) -> Vec<Notification> {
        let mut out: Vec<Notification> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by_key(|n| (n.created_at, *n.id.as_uuid()));
        out
    }

    /// Drop records expired at `now`; returns how many were removed.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, n| n.expires_at > now);
        before - self.entries.len()
    }

    /// Total retained records, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for NotificationHub {
    fn emit(&self, kind: NotificationKind, title: &str, message: &str) -> NotificationId {
        let now = Utc::now();
        let notification = Notification {
            id: NotificationId::new(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: now,
            expires_at: now + self.lifetime,
        };
        let id = notification.id;
        self.entries.insert(id, notification);
        id
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitted_records_are_active_until_expiry() {
        let hub = NotificationHub::new();
        hub.emit(NotificationKind::Success, "Shipment Created", "ok");

        let now = Utc::now();
        assert_eq!(hub.active(now).len(), 1);

        let later = now + Duration::seconds(NotificationHub::DEFAULT_LIFETIME_SECS + 1);
        assert!(hub.active(later).is_empty());
        // Expiry hides a record from `active` but keeps it retained
        // until pruned.
        assert_eq!(hub.all().len(), 1);
    }

    #[test]
    fn prune_removes_only_expired() {
        let hub = NotificationHub::with_lifetime(Duration::seconds(5));
        hub.emit(NotificationKind::Info, "first", "m");
        let cutoff = Utc::now() + Duration::seconds(60);

        assert_eq!(hub.prune_expired(Utc::now()), 0);
        assert_eq!(hub.len(), 1);
        assert_eq!(hub.prune_expired(cutoff), 1);
        assert!(hub.is_empty());
    }

    #[test]
    fn active_is_ordered_oldest_first() {
        let hub = NotificationHub::with_lifetime(Duration::seconds(60));
        hub.emit(NotificationKind::Info, "a", "1");
        hub.emit(NotificationKind::Info, "b", "2");
        hub.emit(NotificationKind::Info, "c", "3");
        let titles: Vec<String> = hub
            .active(Utc::now())
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }
}
