use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};
use dashmap::DashMap;
use sellerdesk_db::models::{ContentObject, ObjectStatus, User};
use tracing::debug;

use super::{NewObject, ObjectQuery, ObjectStore, SortOrder, StoreResult, UserDirectory};

/// Process-local object and identity store backed by `DashMap`.
///
/// Every metadata write holds the record's shard lock for the whole
/// read-compare-write, so single-record updates are atomic.
pub struct MemoryStore {
    objects: DashMap<ObjectId, StoredObject>,
    users: DashMap<ObjectId, User>,
    seq: AtomicU64,
}

struct StoredObject {
    seq: u64,
    object: ContentObject,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            users: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    /// Adds a user to the identity store, assigning an id if it has none.
    pub fn insert_user(&self, mut user: User) -> ObjectId {
        let id = *user.id.get_or_insert_with(ObjectId::new);
        self.users.insert(id, user);
        id
    }

    /// Stores a fully-formed object as is, keeping its timestamps.
    pub fn insert_object(&self, mut object: ContentObject) -> ObjectId {
        let id = *object.id.get_or_insert_with(ObjectId::new);
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.objects.insert(id, StoredObject { seq, object });
        id
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn create_object(&self, object: NewObject) -> StoreResult<ObjectId> {
        let now = DateTime::now();
        let id = self.insert_object(ContentObject {
            id: None,
            object_type: object.object_type,
            author_id: object.author_id,
            title: object.title,
            content: object.content,
            status: ObjectStatus::Publish,
            metadata: object.metadata,
            created_at: now,
            updated_at: now,
        });
        debug!(?id, "Inserted object");
        Ok(id)
    }

    async fn get_object(&self, id: ObjectId) -> StoreResult<Option<ContentObject>> {
        Ok(self.objects.get(&id).map(|stored| stored.object.clone()))
    }

    async fn query_objects(&self, query: &ObjectQuery) -> StoreResult<Vec<ContentObject>> {
        let mut found: Vec<(DateTime, u64, ContentObject)> = self
            .objects
            .iter()
            .filter(|stored| query.matches(&stored.object))
            .map(|stored| (stored.object.created_at, stored.seq, stored.object.clone()))
            .collect();

        found.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        if query.order == SortOrder::Descending {
            found.reverse();
        }

        Ok(found.into_iter().map(|(_, _, object)| object).collect())
    }

    async fn update_metadata(&self, id: ObjectId, key: &str, value: &str) -> StoreResult<bool> {
        let Some(mut stored) = self.objects.get_mut(&id) else {
            return Ok(false);
        };
        if stored.object.meta(key) == Some(value) {
            return Ok(false);
        }
        stored.object.metadata.insert(key.to_string(), value.to_string());
        stored.object.updated_at = DateTime::now();
        Ok(true)
    }

    async fn update_metadata_if(
        &self,
        id: ObjectId,
        key: &str,
        expected: &str,
        value: &str,
    ) -> StoreResult<bool> {
        let Some(mut stored) = self.objects.get_mut(&id) else {
            return Ok(false);
        };
        if stored.object.meta(key) != Some(expected) || expected == value {
            return Ok(false);
        }
        stored.object.metadata.insert(key.to_string(), value.to_string());
        stored.object.updated_at = DateTime::now();
        Ok(true)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn get_user(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username && u.deleted_at.is_none())
            .map(|u| u.clone()))
    }
}
