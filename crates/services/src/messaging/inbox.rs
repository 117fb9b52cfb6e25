use std::collections::HashMap;
use std::sync::Arc;

use bson::{oid::ObjectId, DateTime};
use tracing::warn;

use super::catalog::{ProductCatalog, ProductSnapshot};
use super::error::{MessagingError, MessagingResult};
use super::message::Message;
use super::store::MessageStore;
use crate::store::{ObjectStore, StoreResult, UserDirectory};

pub const UNKNOWN_USER: &str = "Unknown User";

/// One conversation as discovered while scanning a user's messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSummary {
    pub counterpart_id: ObjectId,
    pub latest_message: String,
    pub latest_message_id: ObjectId,
    pub latest_at: DateTime,
    pub message_count: usize,
    pub is_unread: bool,
    /// Product of the most recent message that references one.
    pub product_ref: Option<ObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub threads: Vec<ThreadSummary>,
    /// Number of threads holding at least one message unread by the user.
    pub unread_count: usize,
}

/// Groups `messages` by counterpart.
///
/// `messages` must be ordered newest first. Threads come out in the order
/// their counterpart is first seen, so the thread with the most recent
/// message leads. A self-addressed message forms a thread whose counterpart
/// is the user.
pub fn aggregate_threads(user: ObjectId, messages: &[Message]) -> Aggregation {
    let mut threads: Vec<ThreadSummary> = Vec::new();
    let mut slots: HashMap<ObjectId, usize> = HashMap::new();
    let mut unread_count = 0;

    for message in messages {
        let counterpart = message.counterpart_of(user);
        let slot = match slots.get(&counterpart) {
            Some(&slot) => {
                threads[slot].message_count += 1;
                slot
            }
            None => {
                threads.push(ThreadSummary {
                    counterpart_id: counterpart,
                    latest_message: message.content.clone(),
                    latest_message_id: message.id,
                    latest_at: message.created_at,
                    message_count: 1,
                    is_unread: false,
                    product_ref: None,
                });
                slots.insert(counterpart, threads.len() - 1);
                threads.len() - 1
            }
        };

        let thread = &mut threads[slot];
        if thread.product_ref.is_none() {
            thread.product_ref = message.product_ref;
        }
        if !thread.is_unread && message.is_unread_for(user) {
            thread.is_unread = true;
            unread_count += 1;
        }
    }

    Aggregation {
        threads,
        unread_count,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub counterpart_id: ObjectId,
    pub counterpart_name: String,
    pub counterpart_avatar: Option<String>,
    pub latest_message: String,
    pub latest_message_id: ObjectId,
    pub latest_date: String,
    pub latest_date_formatted: String,
    pub message_count: usize,
    pub is_unread: bool,
    pub product: Option<ProductSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inbox {
    pub threads: Vec<Thread>,
    pub unread_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMessage {
    pub message: Message,
    pub sender_name: String,
    pub sender_avatar: Option<String>,
    pub is_current_user: bool,
    pub date: String,
    pub date_formatted: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadView {
    /// Oldest first.
    pub messages: Vec<ThreadMessage>,
    pub product: Option<ProductSnapshot>,
}

/// Machine-readable and display forms of a message timestamp.
pub fn format_date(at: DateTime) -> (String, String) {
    let at = at.to_chrono();
    (
        at.format("%Y-%m-%d %H:%M:%S").to_string(),
        at.format("%b %-d, %Y %-I:%M %p").to_string(),
    )
}

#[derive(Clone)]
pub struct InboxService {
    messages: MessageStore,
    products: ProductCatalog,
    users: Arc<dyn UserDirectory>,
    enabled: bool,
}

impl InboxService {
    pub fn new(objects: Arc<dyn ObjectStore>, users: Arc<dyn UserDirectory>, enabled: bool) -> Self {
        Self {
            messages: MessageStore::new(objects.clone()),
            products: ProductCatalog::new(objects),
            users,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    /// All of the user's conversations, most recently active first.
    pub async fn build_inbox(&self, user: ObjectId) -> MessagingResult<Inbox> {
        if !self.enabled {
            return Ok(Inbox::default());
        }

        let messages = self.messages.list_messages_involving(user).await?;
        let aggregation = aggregate_threads(user, &messages);

        let mut threads = Vec::with_capacity(aggregation.threads.len());
        for summary in aggregation.threads {
            let (name, avatar) = self.display_identity(summary.counterpart_id).await?;
            let product = match summary.product_ref {
                Some(id) => self.product_or_none(id).await,
                None => None,
            };
            let (latest_date, latest_date_formatted) = format_date(summary.latest_at);
            threads.push(Thread {
                counterpart_id: summary.counterpart_id,
                counterpart_name: name,
                counterpart_avatar: avatar,
                latest_message: summary.latest_message,
                latest_message_id: summary.latest_message_id,
                latest_date,
                latest_date_formatted,
                message_count: summary.message_count,
                is_unread: summary.is_unread,
                product,
            });
        }

        Ok(Inbox {
            threads,
            unread_count: aggregation.unread_count,
        })
    }

    /// Reads the conversation with `counterpart` AND marks every message
    /// addressed to `user` as read.
    ///
    /// A message whose mark fails is logged and returned still unread; the
    /// thread is served regardless.
    pub async fn open_thread(&self, user: ObjectId, counterpart: ObjectId) -> MessagingResult<ThreadView> {
        if !self.enabled {
            return Ok(ThreadView::default());
        }

        let conversation = self.messages.list_conversation(user, counterpart).await?;
        let mut names: HashMap<ObjectId, (String, Option<String>)> = HashMap::new();
        let mut product = None;
        let mut messages = Vec::with_capacity(conversation.len());

        for mut message in conversation {
            if message.is_unread_for(user) {
                match self.messages.mark_read(message.id, user).await {
                    Ok(true) => message.is_read = true,
                    // Someone else may have flipped it; report what is stored.
                    Ok(false) => message.is_read = self.stored_read_flag(message.id).await,
                    Err(e) => warn!(message_id = %message.id, error = %e, "Failed to mark message read"),
                }
            }

            match message.product_ref {
                Some(id) if product.is_none() => product = self.product_or_none(id).await,
                _ => {}
            }

            let (sender_name, sender_avatar) = match names.get(&message.sender_id) {
                Some(known) => known.clone(),
                None => {
                    let identity = self.display_identity(message.sender_id).await?;
                    names.insert(message.sender_id, identity.clone());
                    identity
                }
            };
            let (date, date_formatted) = format_date(message.created_at);
            messages.push(ThreadMessage {
                is_current_user: message.sender_id == user,
                message,
                sender_name,
                sender_avatar,
                date,
                date_formatted,
            });
        }

        Ok(ThreadView { messages, product })
    }

    pub async fn send_reply(
        &self,
        sender: ObjectId,
        receiver: ObjectId,
        content: &str,
        product_ref: Option<ObjectId>,
    ) -> MessagingResult<Message> {
        if !self.enabled {
            return Err(MessagingError::Disabled);
        }
        if sender == receiver {
            return Err(MessagingError::validation(
                "receiver_id",
                "You cannot send a message to yourself",
            ));
        }
        if self.users.get_user(receiver).await?.is_none() {
            return Err(MessagingError::NotFound("Recipient"));
        }

        self.messages
            .append_message(sender, receiver, content, product_ref)
            .await
    }

    /// Marks the listed messages read. Every one must be addressed to
    /// `user`; otherwise nothing is written.
    pub async fn mark_thread_read(&self, user: ObjectId, message_ids: &[ObjectId]) -> MessagingResult<bool> {
        if !self.enabled {
            return Err(MessagingError::Disabled);
        }
        if message_ids.is_empty() {
            return Err(MessagingError::validation("message_ids", "No messages given"));
        }

        for &id in message_ids {
            let addressed_to_user = self
                .messages
                .get(id)
                .await?
                .is_some_and(|message| message.receiver_id == user);
            if !addressed_to_user {
                warn!(message_id = %id, %user, "Refused thread mark-read");
                return Err(MessagingError::Unauthorized);
            }
        }

        for &id in message_ids {
            self.messages.mark_read(id, user).await?;
        }
        Ok(true)
    }

    async fn display_identity(&self, id: ObjectId) -> StoreResult<(String, Option<String>)> {
        Ok(match self.users.get_user(id).await? {
            Some(user) => (user.display_name, user.avatar),
            None => (UNKNOWN_USER.to_string(), None),
        })
    }

    async fn stored_read_flag(&self, id: ObjectId) -> bool {
        match self.messages.get(id).await {
            Ok(stored) => stored.is_some_and(|m| m.is_read),
            Err(e) => {
                warn!(message_id = %id, error = %e, "Failed to re-read message");
                false
            }
        }
    }

    async fn product_or_none(&self, id: ObjectId) -> Option<ProductSnapshot> {
        match self.products.snapshot(id).await {
            Ok(product) => product,
            Err(e) => {
                warn!(product_id = %id, error = %e, "Product lookup failed");
                None
            }
        }
    }
}
