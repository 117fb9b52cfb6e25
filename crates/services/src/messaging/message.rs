use std::collections::BTreeMap;

use bson::{oid::ObjectId, DateTime};
use sellerdesk_db::models::ContentObject;

/// Object type under which messages are stored.
pub const MESSAGE_TYPE: &str = "dashboard_message";

/// Metadata keys of a stored message.
pub mod meta {
    pub const SENDER_ID: &str = "sender_id";
    pub const RECEIVER_ID: &str = "receiver_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const IS_READ: &str = "is_read";

    pub const UNREAD: &str = "0";
    pub const READ: &str = "1";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: ObjectId,
    pub sender_id: ObjectId,
    pub receiver_id: ObjectId,
    pub content: String,
    pub product_ref: Option<ObjectId>,
    pub is_read: bool,
    pub created_at: DateTime,
}

impl Message {
    /// The other participant, seen from `user`. A self-addressed message
    /// has the user as its own counterpart.
    pub fn counterpart_of(&self, user: ObjectId) -> ObjectId {
        if self.sender_id == user {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    pub fn is_unread_for(&self, user: ObjectId) -> bool {
        self.receiver_id == user && !self.is_read
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessageDecodeError {
    #[error("object {0:?} is not a message")]
    WrongType(Option<ObjectId>),
    #[error("object has no id")]
    MissingId,
    #[error("metadata `{0}` is missing or not an object id")]
    BadParticipant(&'static str),
}

impl TryFrom<&ContentObject> for Message {
    type Error = MessageDecodeError;

    fn try_from(object: &ContentObject) -> Result<Self, Self::Error> {
        if object.object_type != MESSAGE_TYPE {
            return Err(MessageDecodeError::WrongType(object.id));
        }
        let id = object.id.ok_or(MessageDecodeError::MissingId)?;
        let participant = |key: &'static str| {
            object
                .meta(key)
                .and_then(|hex| ObjectId::parse_str(hex).ok())
                .ok_or(MessageDecodeError::BadParticipant(key))
        };

        Ok(Self {
            id,
            sender_id: participant(meta::SENDER_ID)?,
            receiver_id: participant(meta::RECEIVER_ID)?,
            content: object.content.clone(),
            // Empty or unparseable product ids mean "no product".
            product_ref: object
                .meta(meta::PRODUCT_ID)
                .and_then(|hex| ObjectId::parse_str(hex).ok()),
            // Only an explicit "0" is unread; a missing flag reads as read.
            is_read: object.meta(meta::IS_READ) != Some(meta::UNREAD),
            created_at: object.created_at,
        })
    }
}

/// Metadata map for a freshly appended, unread message.
pub fn new_message_metadata(
    sender: ObjectId,
    receiver: ObjectId,
    product_ref: Option<ObjectId>,
) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::from([
        (meta::SENDER_ID.to_string(), sender.to_hex()),
        (meta::RECEIVER_ID.to_string(), receiver.to_hex()),
        (meta::IS_READ.to_string(), meta::UNREAD.to_string()),
    ]);
    if let Some(product) = product_ref {
        metadata.insert(meta::PRODUCT_ID.to_string(), product.to_hex());
    }
    metadata
}
