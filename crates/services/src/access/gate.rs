use sellerdesk_config::{DashboardSettings, Settings};

/// What the gate needs to know about one inbound request.
#[derive(Debug, Clone)]
pub struct GateRequest<'a> {
    pub path: &'a str,
    pub authenticated: bool,
    /// Value of the `redirect_to` query parameter, if any.
    pub redirect_to: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin { location: String },
    /// Unauthenticated, but a redirect was already issued for this
    /// navigation. Answer without redirecting again.
    LoginRequired,
}

/// Per-request dashboard access decision.
///
/// At most one redirect is issued per navigation: a request whose
/// `redirect_to` already points at the dashboard is never redirected.
#[derive(Debug, Clone)]
pub struct AccessGate {
    dashboard_path: String,
    login_path: String,
    admin_path: String,
    dashboard_url: String,
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

fn is_at_or_below(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl AccessGate {
    pub fn new(dashboard: &DashboardSettings, base_url: &str) -> Self {
        Self {
            dashboard_path: normalize(&dashboard.path),
            login_path: normalize(&dashboard.login_path),
            admin_path: normalize(&dashboard.admin_path),
            dashboard_url: dashboard.dashboard_url(base_url),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.dashboard, &settings.app.base_url)
    }

    pub fn dashboard_url(&self) -> &str {
        &self.dashboard_url
    }

    pub fn login_location(&self) -> String {
        format!(
            "{}?redirect_to={}",
            self.login_path,
            urlencoding::encode(&self.dashboard_url)
        )
    }

    pub fn is_dashboard(&self, path: &str) -> bool {
        is_at_or_below(&normalize(path), &self.dashboard_path)
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        normalize(path) == self.login_path
    }

    pub fn is_admin_context(&self, path: &str) -> bool {
        is_at_or_below(&normalize(path), &self.admin_path)
    }

    pub fn decide(&self, request: &GateRequest<'_>) -> GateDecision {
        let path = request.path;
        if request.authenticated
            || !self.is_dashboard(path)
            || self.is_auth_route(path)
            || self.is_admin_context(path)
        {
            return GateDecision::Allow;
        }

        let already_redirected = request.redirect_to.is_some_and(|target| {
            target.trim_end_matches('/') == self.dashboard_url.trim_end_matches('/')
        });
        if already_redirected {
            GateDecision::LoginRequired
        } else {
            GateDecision::RedirectToLogin {
                location: self.login_location(),
            }
        }
    }
}
