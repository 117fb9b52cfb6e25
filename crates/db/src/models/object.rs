use std::collections::BTreeMap;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A generic record in the host platform's object store.
///
/// Typed records (messages, products) are projections of this shape: the
/// `object_type` discriminates them and everything type-specific lives in
/// the flat string `metadata` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentObject {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub object_type: String,
    pub author_id: Option<ObjectId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: ObjectStatus,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    #[default]
    Publish,
    Draft,
    Private,
}

impl ContentObject {
    pub const COLLECTION: &'static str = "objects";

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
