use std::collections::BTreeSet;
use std::sync::Arc;

use sellerdesk_db::models::User;

use super::tables::{AccessTables, CapabilitySet, MenuItem};

/// The parts of a user that permissions are derived from.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub roles: Vec<String>,
    /// Grants held directly by the user, on top of those implied by roles.
    pub capabilities: Vec<String>,
}

impl Identity {
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            capabilities: Vec::new(),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            roles: user.roles.clone(),
            capabilities: user.capabilities.clone(),
        }
    }
}

/// Maps identities to capability sets and navigation menus.
#[derive(Debug, Clone)]
pub struct CapabilityResolver {
    tables: Arc<AccessTables>,
}

impl CapabilityResolver {
    pub fn new(tables: Arc<AccessTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &AccessTables {
        &self.tables
    }

    /// First role of the priority list the user holds, else their first
    /// listed role, else the fallback role.
    pub fn primary_role<'a>(&'a self, roles: &'a [String]) -> &'a str {
        self.tables
            .role_priority()
            .iter()
            .find(|candidate| roles.contains(*candidate))
            .or_else(|| roles.first())
            .map(String::as_str)
            .unwrap_or_else(|| self.tables.fallback_role())
    }

    pub fn resolve(&self, identity: &Identity) -> &CapabilitySet {
        let role = self.primary_role(&identity.roles);
        self.tables
            .capability_set(role)
            .unwrap_or_else(|| self.tables.fallback_set())
    }

    /// Union of the grants of every role plus the user's direct grants.
    pub fn permissions(&self, identity: &Identity) -> BTreeSet<String> {
        identity
            .roles
            .iter()
            .flat_map(|role| self.tables.grants(role).iter().cloned())
            .chain(identity.capabilities.iter().cloned())
            .collect()
    }

    /// Menu items in the order the primary role lists them, minus unknown
    /// keys and items whose required capability the user lacks.
    pub fn visible_menu(&self, identity: &Identity) -> Vec<&MenuItem> {
        let permissions = self.permissions(identity);
        self.resolve(identity)
            .menu_items
            .iter()
            .filter_map(|key| self.tables.menu_item(key))
            .filter(|item| {
                item.required_capability
                    .as_ref()
                    .is_none_or(|cap| permissions.contains(cap))
            })
            .collect()
    }

    pub fn can_view_tab(&self, identity: &Identity, key: &str) -> bool {
        self.visible_menu(identity).iter().any(|item| item.key == key)
    }
}
