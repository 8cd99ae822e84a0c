//! System notifications broadcast to every user.

use crate::storage::records::{notification_from_document, NOTIFICATIONS};
use crate::storage::{DocumentStore, OrderBy};
use anyhow::Result;
use mnu_shared::Notification;
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_NOTIFICATIONS_MESSAGE: &str = "There are no new notifications.";

/// What the notifications tab renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationFeed {
    Empty,
    Items(Vec<Notification>),
}

impl NotificationFeed {
    pub fn from_notifications(notifications: Vec<Notification>) -> Self {
        if notifications.is_empty() {
            NotificationFeed::Empty
        } else {
            NotificationFeed::Items(notifications)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NotificationFeed::Empty => 0,
            NotificationFeed::Items(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn DocumentStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Newest first; documents that do not decode are skipped
    pub async fn list(&self) -> Result<Vec<Notification>> {
        let documents = self
            .store
            .query(NOTIFICATIONS, &[], Some(OrderBy::descending("timestamp")))
            .await?;

        let total = documents.len();
        let mut notifications: Vec<Notification> =
            documents.iter().filter_map(notification_from_document).collect();
        if notifications.len() < total {
            warn!("Skipped {} malformed notifications", total - notifications.len());
        }
        // Stored timestamps are strings; order on the parsed values
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        info!("Loaded {} notifications", notifications.len());
        Ok(notifications)
    }

    pub async fn feed(&self) -> Result<NotificationFeed> {
        Ok(NotificationFeed::from_notifications(self.list().await?))
    }
}
