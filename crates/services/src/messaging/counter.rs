use std::collections::HashSet;
use std::sync::Arc;

use bson::oid::ObjectId;

use super::store::MessageStore;
use crate::store::{ObjectStore, StoreResult};

/// Unread-sender badge count, recomputed from stored messages on every call.
#[derive(Clone)]
pub struct NotificationCounter {
    messages: MessageStore,
    enabled: bool,
}

impl NotificationCounter {
    pub fn new(objects: Arc<dyn ObjectStore>, enabled: bool) -> Self {
        Self {
            messages: MessageStore::new(objects),
            enabled,
        }
    }

    /// Number of distinct senders with at least one message unread by `user`.
    pub async fn unread_count(&self, user: ObjectId) -> StoreResult<usize> {
        if !self.enabled {
            return Ok(0);
        }
        let unread = self.messages.list_unread_for(user).await?;
        let senders: HashSet<ObjectId> = unread.iter().map(|m| m.sender_id).collect();
        Ok(senders.len())
    }

    /// Anonymous callers always see zero.
    pub async fn unread_count_for(&self, user: Option<ObjectId>) -> StoreResult<usize> {
        match user {
            Some(user) => self.unread_count(user).await,
            None => Ok(0),
        }
    }
}
