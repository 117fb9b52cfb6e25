use mongodb::Database;
use sellerdesk_config::Settings;
use sellerdesk_services::{
    AccessGate, AccessTables, AuthService, CapabilityResolver, InboxService, NonceService,
    NotificationCounter, ObjectStore, TabRouter, UserDirectory,
    dao::{ObjectDao, UserDao},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub nonces: Arc<NonceService>,
    pub users: Arc<dyn UserDirectory>,
    pub resolver: CapabilityResolver,
    pub tabs: TabRouter,
    pub gate: Arc<AccessGate>,
    pub inbox: InboxService,
    pub counter: NotificationCounter,
}

impl AppState {
    pub fn new(db: &Database, settings: Settings) -> Self {
        Self::with_stores(
            Arc::new(ObjectDao::new(db)),
            Arc::new(UserDao::new(db)),
            settings,
        )
    }

    /// Builds the state over any storage backend.
    pub fn with_stores(
        objects: Arc<dyn ObjectStore>,
        users: Arc<dyn UserDirectory>,
        settings: Settings,
    ) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let nonces = Arc::new(NonceService::new(
            &settings.jwt.secret,
            settings.dashboard.nonce_ttl_secs,
        ));
        let resolver = CapabilityResolver::new(Arc::new(AccessTables::standard()));
        let tabs = TabRouter::new(resolver.clone());
        let gate = Arc::new(AccessGate::from_settings(&settings));
        let messaging = settings.messaging.enabled;
        let inbox = InboxService::new(objects.clone(), users.clone(), messaging);
        let counter = NotificationCounter::new(objects, messaging);

        Self {
            settings,
            auth,
            nonces,
            users,
            resolver,
            tabs,
            gate,
            inbox,
            counter,
        }
    }
}
