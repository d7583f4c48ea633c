//! In-app notifications
//!
//! Notifications are persisted and broadcast to connected WebSocket
//! clients. A failure to persist a notification is logged and never fails
//! the operation that triggered it.

use tokio::sync::broadcast;

use crate::error::{AppError, AppResult};
use crate::models::notification::UnreadCount;
use crate::models::{Notification, User};
use crate::store::Store;

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Live feed of the notifications addressed to `user_id`
    pub fn subscribe_user(&self, user_id: impl Into<String>) -> UserFeed {
        UserFeed {
            rx: self.tx.subscribe(),
            user_id: user_id.into(),
        }
    }

    pub async fn notify(&self, store: &Store, notification: Notification) {
        match store.notifications.insert(notification).await {
            Ok(saved) => {
                tracing::debug!(user = %saved.user_id, kind = %saved.kind, "Notification created");
                // No receivers is fine
                let _ = self.tx.send(saved);
            }
            Err(e) => tracing::warn!("Failed to store notification: {}", e),
        }
    }
}

/// Broadcast receiver that only yields one user's notifications
pub struct UserFeed {
    rx: broadcast::Receiver<Notification>,
    user_id: String,
}

impl UserFeed {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Next notification for this user, or `None` once the notifier is
    /// gone. Cancel safe; messages dropped by a lagging receiver are
    /// skipped with a warning.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            match self.rx.recv().await {
                Ok(notification) if notification.user_id == self.user_id => {
                    return Some(notification)
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(user = %self.user_id, "Notification feed lagged by {} messages", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Newest first
pub async fn list(store: &Store, actor: &User, unread_only: bool) -> AppResult<Vec<Notification>> {
    let mut items: Vec<Notification> = store
        .notifications
        .list()
        .await?
        .into_iter()
        .filter(|n| n.user_id == actor.id && (!unread_only || !n.read))
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
}

pub async fn unread_count(store: &Store, actor: &User) -> AppResult<UnreadCount> {
    let unread = store
        .notifications
        .list()
        .await?
        .iter()
        .filter(|n| n.user_id == actor.id && !n.read)
        .count();
    Ok(UnreadCount { unread })
}

pub async fn mark_read(store: &Store, actor: &User, id: &str) -> AppResult<Notification> {
    store
        .notifications
        .update(id, |n, _| {
            ensure_owner(n, actor)?;
            n.read = true;
            Ok(())
        })
        .await
}

/// Returns how many notifications changed
pub async fn mark_all_read(store: &Store, actor: &User) -> AppResult<usize> {
    store
        .notifications
        .update_all(|n| {
            if n.user_id == actor.id && !n.read {
                n.read = true;
                true
            } else {
                false
            }
        })
        .await
}

pub async fn delete(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    store
        .notifications
        .remove_if(id, |n, _| ensure_owner(n, actor))
        .await?;
    Ok(())
}

fn ensure_owner(notification: &Notification, actor: &User) -> AppResult<()> {
    if notification.user_id != actor.id {
        // Don't reveal other users' notifications exist
        return Err(AppError::not_found("Notification", notification.id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;

    #[tokio::test]
    async fn test_user_feed_skips_other_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let notifier = Notifier::default();
        let mut feed = notifier.subscribe_user("u1");

        notifier
            .notify(&store, Notification::new("u2", NotificationKind::TaskAssigned, "Not yours"))
            .await;
        notifier
            .notify(&store, Notification::new("u1", NotificationKind::LeadAssigned, "Yours"))
            .await;

        let received = feed.next().await.unwrap();
        assert_eq!(received.user_id, "u1");
        assert_eq!(received.message, "Yours");

        drop(notifier);
        assert!(feed.next().await.is_none());
        assert_eq!(store.notifications.list().await.unwrap().len(), 2);
    }
}
