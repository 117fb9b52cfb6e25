//! Boundary to the host platform's storage.
//!
//! The dashboard never owns a schema of its own: messages and product
//! snapshots are read from and written to generic content objects, and users
//! come from the platform's identity store. Both are expressed as traits so
//! the MongoDB implementation in [`crate::dao`] and the in-memory one in
//! [`memory`] are interchangeable.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use sellerdesk_db::models::{ContentObject, User};
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Unexpected store response: {0}")]
    Unexpected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields of an object about to be created. Id and timestamps are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewObject {
    pub object_type: String,
    pub author_id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub metadata: BTreeMap<String, String>,
}

/// Predicate over an object's metadata map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaFilter {
    Eq(String, String),
    All(Vec<MetaFilter>),
    Any(Vec<MetaFilter>),
}

impl MetaFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        MetaFilter::Eq(key.into(), value.into())
    }

    pub fn matches(&self, metadata: &BTreeMap<String, String>) -> bool {
        match self {
            MetaFilter::Eq(key, value) => metadata.get(key) == Some(value),
            MetaFilter::All(filters) => filters.iter().all(|f| f.matches(metadata)),
            MetaFilter::Any(filters) => filters.iter().any(|f| f.matches(metadata)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Objects of one type, optionally filtered, ordered by creation time.
/// Objects created within the same instant keep their insertion order.
#[derive(Debug, Clone)]
pub struct ObjectQuery {
    pub object_type: String,
    pub filter: Option<MetaFilter>,
    pub order: SortOrder,
}

impl ObjectQuery {
    pub fn of_type(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            filter: None,
            order: SortOrder::default(),
        }
    }

    pub fn filter(mut self, filter: MetaFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn matches(&self, object: &ContentObject) -> bool {
        object.object_type == self.object_type
            && self
                .filter
                .as_ref()
                .is_none_or(|f| f.matches(&object.metadata))
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create_object(&self, object: NewObject) -> StoreResult<ObjectId>;

    async fn get_object(&self, id: ObjectId) -> StoreResult<Option<ContentObject>>;

    async fn query_objects(&self, query: &ObjectQuery) -> StoreResult<Vec<ContentObject>>;

    /// Sets one metadata key. Returns whether the stored value changed.
    async fn update_metadata(&self, id: ObjectId, key: &str, value: &str) -> StoreResult<bool>;

    /// Sets one metadata key only while it still holds `expected`, as a
    /// single-record atomic write. Returns whether the write happened.
    async fn update_metadata_if(
        &self,
        id: ObjectId,
        key: &str,
        expected: &str,
        value: &str,
    ) -> StoreResult<bool>;
}

/// Read-only view of the platform's identity store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: ObjectId) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
}
