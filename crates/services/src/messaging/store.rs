use std::sync::Arc;

use bson::oid::ObjectId;
use sellerdesk_db::models::ContentObject;
use tracing::{debug, warn};

use super::error::{MessagingError, MessagingResult};
use super::message::{meta, new_message_metadata, Message, MESSAGE_TYPE};
use crate::store::{MetaFilter, NewObject, ObjectQuery, ObjectStore, SortOrder, StoreError, StoreResult};

/// Typed message access over the generic object store.
#[derive(Clone)]
pub struct MessageStore {
    objects: Arc<dyn ObjectStore>,
}

fn sent_by(user: ObjectId) -> MetaFilter {
    MetaFilter::eq(meta::SENDER_ID, user.to_hex())
}

fn sent_to(user: ObjectId) -> MetaFilter {
    MetaFilter::eq(meta::RECEIVER_ID, user.to_hex())
}

impl MessageStore {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// Every message the user sent or received, newest first.
    pub async fn list_messages_involving(&self, user: ObjectId) -> StoreResult<Vec<Message>> {
        let query = ObjectQuery::of_type(MESSAGE_TYPE)
            .filter(MetaFilter::Any(vec![sent_by(user), sent_to(user)]))
            .order(SortOrder::Descending);
        self.fetch(&query).await
    }

    /// Both directions of the conversation between `a` and `b`, oldest first.
    pub async fn list_conversation(&self, a: ObjectId, b: ObjectId) -> StoreResult<Vec<Message>> {
        let query = ObjectQuery::of_type(MESSAGE_TYPE)
            .filter(MetaFilter::Any(vec![
                MetaFilter::All(vec![sent_by(a), sent_to(b)]),
                MetaFilter::All(vec![sent_by(b), sent_to(a)]),
            ]))
            .order(SortOrder::Ascending);
        self.fetch(&query).await
    }

    /// Unread messages addressed to the user, newest first.
    pub async fn list_unread_for(&self, user: ObjectId) -> StoreResult<Vec<Message>> {
        let query = ObjectQuery::of_type(MESSAGE_TYPE).filter(MetaFilter::All(vec![
            sent_to(user),
            MetaFilter::eq(meta::IS_READ, meta::UNREAD),
        ]));
        self.fetch(&query).await
    }

    pub async fn get(&self, id: ObjectId) -> StoreResult<Option<Message>> {
        let Some(object) = self.objects.get_object(id).await? else {
            return Ok(None);
        };
        if object.object_type != MESSAGE_TYPE {
            return Ok(None);
        }
        Ok(decode(&object))
    }

    /// Stores a new unread message. Content is trimmed and must not be empty.
    pub async fn append_message(
        &self,
        sender: ObjectId,
        receiver: ObjectId,
        content: &str,
        product_ref: Option<ObjectId>,
    ) -> MessagingResult<Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(MessagingError::validation("message", "Message cannot be empty"));
        }

        let id = self
            .objects
            .create_object(NewObject {
                object_type: MESSAGE_TYPE.to_string(),
                author_id: Some(sender),
                title: format!("Message from User {}", sender.to_hex()),
                content: content.to_string(),
                metadata: new_message_metadata(sender, receiver, product_ref),
            })
            .await?;
        debug!(%id, %sender, %receiver, "Appended message");

        self.get(id)
            .await?
            .ok_or_else(|| StoreError::Unexpected(format!("message {id} vanished after insert")).into())
    }

    /// Flips the read flag. Only the receiver may do so; returns whether the
    /// flag changed, so a repeated call is `Ok(false)`.
    pub async fn mark_read(&self, message_id: ObjectId, acting_user: ObjectId) -> MessagingResult<bool> {
        let message = self
            .get(message_id)
            .await?
            .ok_or(MessagingError::NotFound("Message"))?;

        if message.receiver_id != acting_user {
            warn!(%message_id, %acting_user, "Refused to mark a message not addressed to the caller");
            return Err(MessagingError::Unauthorized);
        }
        if message.is_read {
            return Ok(false);
        }

        let changed = self
            .objects
            .update_metadata_if(message_id, meta::IS_READ, meta::UNREAD, meta::READ)
            .await?;
        if changed {
            debug!(%message_id, "Marked message read");
        }
        Ok(changed)
    }

    async fn fetch(&self, query: &ObjectQuery) -> StoreResult<Vec<Message>> {
        let objects = self.objects.query_objects(query).await?;
        Ok(objects.iter().filter_map(decode).collect())
    }
}

fn decode(object: &ContentObject) -> Option<Message> {
    Message::try_from(object)
        .inspect_err(|e| warn!(id = ?object.id, error = %e, "Skipping malformed message"))
        .ok()
}
