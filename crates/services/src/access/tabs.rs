use serde::Serialize;

use super::resolver::{CapabilityResolver, Identity};
use super::tables::{tabs, MenuItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TabAction {
    Render,
    Logout,
}

/// Where a dashboard request ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabRoute {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub template_ref: Option<String>,
    pub action: TabAction,
    /// The requested tab was not visible to the user and `overview` was
    /// served instead.
    pub fell_back: bool,
}

impl TabRoute {
    fn from_item(item: &MenuItem, action: TabAction, fell_back: bool) -> Self {
        Self {
            key: item.key.clone(),
            label: item.label.clone(),
            icon: item.icon.clone(),
            template_ref: item.template_ref.clone(),
            action,
            fell_back,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabRouter {
    resolver: CapabilityResolver,
}

impl TabRouter {
    pub fn new(resolver: CapabilityResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &CapabilityResolver {
        &self.resolver
    }

    /// Resolves the requested tab for this identity. Never denies: a tab the
    /// user cannot see silently becomes `overview`.
    pub fn route(&self, identity: &Identity, requested: Option<&str>) -> TabRoute {
        let requested = requested
            .map(|tab| tab.trim_matches('/'))
            .filter(|tab| !tab.is_empty());

        if requested == Some(tabs::LOGOUT) {
            return self.route_to(tabs::LOGOUT, TabAction::Logout, false);
        }

        match requested {
            None => self.route_to(tabs::OVERVIEW, TabAction::Render, false),
            Some(tab) if self.resolver.can_view_tab(identity, tab) => {
                self.route_to(tab, TabAction::Render, false)
            }
            Some(_) => self.route_to(tabs::OVERVIEW, TabAction::Render, true),
        }
    }

    fn route_to(&self, key: &str, action: TabAction, fell_back: bool) -> TabRoute {
        match self.resolver.tables().menu_item(key) {
            Some(item) => TabRoute::from_item(item, action, fell_back),
            None => TabRoute {
                key: key.to_string(),
                label: key.to_string(),
                icon: String::new(),
                template_ref: None,
                action,
                fell_back,
            },
        }
    }
}
