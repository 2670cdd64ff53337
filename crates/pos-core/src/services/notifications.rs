//! Operator-visible notifications (toasts)

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub role_id: Option<Uuid>,
    pub at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Nobody listening means the view is gone; the notification is dropped.
    pub fn publish(&self, level: NotificationLevel, message: impl Into<String>, role_id: Option<Uuid>) {
        let notification = Notification {
            level,
            message: message.into(),
            role_id,
            at: Utc::now(),
        };
        if self.tx.send(notification).is_err() {
            debug!("Notification dropped (no subscribers)");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}
