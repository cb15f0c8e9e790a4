//! Transient toast notifications with independent expiry

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{Event, EventSender};
use crate::scheduler::Scheduler;

/// Default time a toast stays visible
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Active toasts in creation order, each with its own expiry timer
pub struct NotificationCenter {
    entries: Vec<Notification>,
    next_id: u64,
    ttl: Duration,
    timers: Scheduler<NotificationId>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration, events: EventSender) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            ttl,
            timers: Scheduler::new(events),
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        tracing::debug!(%id, ?severity, text = %notification.message, "Notification raised");
        self.entries.push(notification);
        self.timers
            .schedule(id, self.ttl, Event::NotificationExpired(id));
        id
    }

    /// Remove a toast on user request. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.timers.cancel(&id);
        self.remove(id)
    }

    /// Remove a toast whose timer fired
    pub fn expire(&mut self, id: NotificationId) -> bool {
        self.timers.complete(&id);
        self.remove(id)
    }

    fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        before != self.entries.len()
    }

    #[must_use]
    pub fn active(&self) -> &[Notification] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
