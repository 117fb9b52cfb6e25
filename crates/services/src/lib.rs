pub mod access;
pub mod auth;
pub mod dao;
pub mod messaging;
pub mod store;

pub use access::{AccessGate, AccessTables, CapabilityResolver, TabRouter};
pub use auth::{AuthService, NonceService};
pub use dao::*;
pub use messaging::{InboxService, MessagingError, NotificationCounter};
pub use store::{MemoryStore, ObjectStore, StoreError, UserDirectory};
