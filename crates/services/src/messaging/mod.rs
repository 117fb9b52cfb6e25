//! Buyer/seller messaging stored as generic content objects.

pub mod catalog;
pub mod counter;
pub mod error;
pub mod inbox;
pub mod message;
pub mod store;

pub use catalog::{ProductCatalog, ProductSnapshot};
pub use counter::NotificationCounter;
pub use error::{MessagingError, MessagingResult};
pub use inbox::{aggregate_threads, Inbox, InboxService, Thread, ThreadMessage, ThreadView};
pub use message::Message;
pub use store::MessageStore;
