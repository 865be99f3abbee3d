// src/notify.rs - Realtime admin-notification feed and badge state

use std::sync::Arc;

use dashmap::DashMap;
use futures::channel::mpsc;
use futures::StreamExt;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::backend::BackendArc;
use crate::error::Result;
use crate::model::AdminNotification;

type SubscriberMap = DashMap<Uuid, mpsc::UnboundedSender<AdminNotification>>;

/// Fan-out hub for newly inserted admin notifications.
///
/// The push channel from the backend feeds `publish`; interested surfaces
/// hold a `NotificationSubscription`. Subscriptions are explicit
/// resources: dropping the handle (or calling `unsubscribe`) removes the
/// subscriber deterministically, so connection lifecycle is visible in
/// tests rather than an ambient always-on listener.
#[derive(Debug, Clone, Default)]
pub struct NotificationHub {
    subscribers: Arc<SubscriberMap>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> NotificationSubscription {
        let (sender, receiver) = mpsc::unbounded();
        let id = Uuid::new_v4();
        self.subscribers.insert(id, sender);

        NotificationSubscription {
            id,
            receiver,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Delivers an inserted notification to all live subscribers
    pub fn publish(&self, notification: AdminNotification) {
        let mut closed = Vec::new();
        for entry in self.subscribers.iter() {
            if entry.value().unbounded_send(notification.clone()).is_err() {
                closed.push(*entry.key());
            }
        }
        for id in closed {
            self.subscribers.remove(&id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// A live subscription to the notification feed.
///
/// Teardown is guaranteed: the subscriber slot is released on drop.
pub struct NotificationSubscription {
    id: Uuid,
    receiver: mpsc::UnboundedReceiver<AdminNotification>,
    subscribers: Arc<SubscriberMap>,
}

impl NotificationSubscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Waits for the next pushed notification; `None` once unsubscribed
    /// and drained
    pub async fn next(&mut self) -> Option<AdminNotification> {
        self.receiver.next().await
    }

    /// Non-blocking poll of the queue
    pub fn try_next(&mut self) -> Option<AdminNotification> {
        self.receiver.try_next().ok().flatten()
    }

    /// Explicitly releases the subscription
    pub fn unsubscribe(self) {}
}

impl Drop for NotificationSubscription {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
    }
}

impl std::fmt::Debug for NotificationSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSubscription")
            .field("id", &self.id)
            .finish()
    }
}

/// Admin notification list and unread badge.
///
/// Mutations go to the backend first; local state changes only after the
/// write succeeds. Realtime inserts arrive through `ingest`.
#[derive(Clone)]
pub struct NotificationCenter {
    backend: BackendArc,
    notifications: Arc<RwLock<Vec<AdminNotification>>>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("notifications", &self.notifications.read().len())
            .finish()
    }
}

impl NotificationCenter {
    pub fn new(backend: BackendArc) -> Self {
        Self {
            backend,
            notifications: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Reloads the full notification list from the backend
    pub async fn refresh(&self) -> Result<()> {
        let fetched = self.backend.fetch_notifications().await?;
        *self.notifications.write() = fetched;
        Ok(())
    }

    /// Prepends a realtime-inserted notification
    pub fn ingest(&self, notification: AdminNotification) {
        self.notifications.write().insert(0, notification);
    }

    pub fn notifications(&self) -> Vec<AdminNotification> {
        self.notifications.read().clone()
    }

    /// Unread count, derived fresh from the list
    pub fn unread_count(&self) -> usize {
        self.notifications.read().iter().filter(|n| !n.is_read).count()
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.backend.mark_notification_read(id).await?;
        let mut notifications = self.notifications.write();
        if let Some(n) = notifications.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.backend.mark_all_notifications_read().await?;
        for n in self.notifications.write().iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.backend.delete_notification(id).await?;
        self.notifications.write().retain(|n| n.id != id);
        Ok(())
    }
}
