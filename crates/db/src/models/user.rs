use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Host platform role labels, in the order the identity store lists them.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Capabilities granted to this user directly, on top of their roles.
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
