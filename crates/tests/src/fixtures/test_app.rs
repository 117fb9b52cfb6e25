use sellerdesk_api::{build_router, state::AppState};
use sellerdesk_config::Settings;
use sellerdesk_services::MemoryStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A running test application backed by its own in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub settings: Settings,
    /// Anonymous client: keeps cookies, never follows redirects.
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(|_| {}).await
    }

    /// Spawn a test server with customized settings.
    ///
    /// The `mutator` closure receives a `&mut Settings` after defaults are applied.
    pub async fn spawn_with_settings(mutator: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = test_settings();
        mutator(&mut settings);

        let store = Arc::new(MemoryStore::new());
        let app_state = AppState::with_stores(store.clone(), store.clone(), settings.clone());
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{}", addr);
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            base_url,
            store,
            settings,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn test_settings() -> Settings {
    Settings {
        app: sellerdesk_config::AppSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            base_url: "http://shop.test".to_string(),
            cors_origins: vec![],
        },
        database: sellerdesk_config::DatabaseSettings {
            url: "mongodb://localhost:27017".to_string(),
            name: "sellerdesk_test".to_string(),
            max_pool_size: Some(5),
            min_pool_size: Some(1),
        },
        jwt: sellerdesk_config::JwtSettings {
            secret: "test-secret-key-for-jwt-signing-minimum-32-chars".to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 604800,
            issuer: "sellerdesk".to_string(),
        },
        dashboard: sellerdesk_config::DashboardSettings {
            path: "/user-dashboard".to_string(),
            login_path: "/login".to_string(),
            admin_path: "/admin".to_string(),
            nonce_ttl_secs: 43200,
        },
        messaging: sellerdesk_config::MessagingSettings {
            enabled: true,
            poll_interval_secs: 30,
        },
    }
}
