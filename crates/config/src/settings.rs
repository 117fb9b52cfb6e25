use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub dashboard: DashboardSettings,
    pub messaging: MessagingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    /// Public origin used to build absolute dashboard URLs.
    pub base_url: String,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub path: String,
    pub login_path: String,
    pub admin_path: String,
    pub nonce_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MessagingSettings {
    pub enabled: bool,
    pub poll_interval_secs: u64,
}

impl DashboardSettings {
    /// Absolute URL of the dashboard root, always with a trailing slash.
    pub fn dashboard_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/",
            base_url.trim_end_matches('/'),
            self.path.trim_matches('/')
        )
    }

    /// Absolute URL of a single dashboard tab.
    pub fn tab_url(&self, base_url: &str, tab: &str) -> String {
        format!("{}{}/", self.dashboard_url(base_url), tab)
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("SELLERDESK"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.base_url", "http://localhost:3000")?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "sellerdesk")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_ttl_secs", 3600)?
            .set_default("jwt.refresh_token_ttl_secs", 604800)?
            .set_default("jwt.issuer", "sellerdesk")?
            .set_default("dashboard.path", "/user-dashboard")?
            .set_default("dashboard.login_path", "/login")?
            .set_default("dashboard.admin_path", "/admin")?
            .set_default("dashboard.nonce_ttl_secs", 43200)?
            .set_default("messaging.enabled", true)?
            .set_default("messaging.poll_interval_secs", 30)?
            .build()?;

        config.try_deserialize()
    }

    pub fn dashboard_url(&self) -> String {
        self.dashboard.dashboard_url(&self.app.base_url)
    }
}
