use std::collections::HashMap;

use serde::Serialize;

/// Host platform capability names.
pub mod caps {
    pub const READ: &str = "read";
    pub const EDIT_PRODUCTS: &str = "edit_products";
    pub const EDIT_OTHERS_PRODUCTS: &str = "edit_others_products";
    pub const DELETE_PRODUCTS: &str = "delete_products";
    pub const MANAGE_OPTIONS: &str = "manage_options";
}

pub mod roles {
    pub const ADMINISTRATOR: &str = "administrator";
    pub const EDITOR: &str = "editor";
    pub const AUTHOR: &str = "author";
    pub const CUSTOMER: &str = "customer";
    pub const SUBSCRIBER: &str = "subscriber";
}

pub mod tabs {
    pub const OVERVIEW: &str = "overview";
    pub const PRODUCTS: &str = "products";
    pub const ADD_PRODUCT: &str = "add-product";
    pub const CART: &str = "cart";
    pub const FAVOURITES: &str = "favourites";
    pub const INBOX: &str = "inbox";
    pub const ACCOUNT: &str = "account";
    pub const LOGOUT: &str = "logout";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySet {
    pub can_manage_products: bool,
    pub can_add_products: bool,
    pub can_delete_products: bool,
    pub can_edit_all_products: bool,
    /// Tab keys in display order.
    pub menu_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub icon: String,
    /// `None` for action items that have nothing to render.
    pub template_ref: Option<String>,
    pub required_capability: Option<String>,
    pub has_unread_counter: bool,
}

/// Role and menu configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AccessTables {
    role_priority: Vec<String>,
    fallback_role: String,
    fallback_set: CapabilitySet,
    capability_sets: HashMap<String, CapabilitySet>,
    menu: HashMap<String, MenuItem>,
    role_grants: HashMap<String, Vec<String>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn capability_set(manage: bool, add: bool, delete: bool, edit_all: bool, menu: &[&str]) -> CapabilitySet {
    CapabilitySet {
        can_manage_products: manage,
        can_add_products: add,
        can_delete_products: delete,
        can_edit_all_products: edit_all,
        menu_items: owned(menu),
    }
}

fn menu_item(key: &str, label: &str, icon: &str, template: Option<&str>, capability: &str) -> MenuItem {
    MenuItem {
        key: key.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
        template_ref: template.map(str::to_string),
        required_capability: Some(capability.to_string()),
        has_unread_counter: false,
    }
}

impl AccessTables {
    pub fn standard() -> Self {
        use tabs::*;

        let seller_menu = [OVERVIEW, PRODUCTS, ADD_PRODUCT, INBOX, ACCOUNT, LOGOUT];
        let buyer_menu = [CART, FAVOURITES, INBOX, ACCOUNT, LOGOUT];

        let subscriber = capability_set(false, false, false, false, &buyer_menu);
        let capability_sets = HashMap::from([
            (roles::ADMINISTRATOR.to_string(), capability_set(true, true, true, true, &seller_menu)),
            (roles::EDITOR.to_string(), capability_set(true, true, true, true, &seller_menu)),
            (roles::AUTHOR.to_string(), capability_set(true, true, false, false, &seller_menu)),
            (roles::CUSTOMER.to_string(), capability_set(false, false, false, false, &buyer_menu)),
            (roles::SUBSCRIBER.to_string(), subscriber.clone()),
        ]);

        let inbox = MenuItem {
            has_unread_counter: true,
            ..menu_item(INBOX, "Inbox", "📨", Some("inbox.php"), caps::READ)
        };
        let menu = [
            menu_item(OVERVIEW, "Overview", "📊", Some("overview.php"), caps::READ),
            menu_item(PRODUCTS, "Products", "🛍️", Some("products.php"), caps::EDIT_PRODUCTS),
            menu_item(ADD_PRODUCT, "Add New Product", "➕", Some("add-product.php"), caps::EDIT_PRODUCTS),
            menu_item(CART, "Cart", "🛒", Some("cart.php"), caps::READ),
            menu_item(FAVOURITES, "Favourites", "❤️", Some("favourites.php"), caps::READ),
            inbox,
            menu_item(ACCOUNT, "Account", "👤", Some("account.php"), caps::READ),
            menu_item(LOGOUT, "Logout", "🚪", None, caps::READ),
        ]
        .into_iter()
        .map(|item| (item.key.clone(), item))
        .collect();

        let role_grants = HashMap::from([
            (
                roles::ADMINISTRATOR.to_string(),
                owned(&[
                    caps::READ,
                    caps::EDIT_PRODUCTS,
                    caps::EDIT_OTHERS_PRODUCTS,
                    caps::DELETE_PRODUCTS,
                    caps::MANAGE_OPTIONS,
                ]),
            ),
            (
                roles::EDITOR.to_string(),
                owned(&[
                    caps::READ,
                    caps::EDIT_PRODUCTS,
                    caps::EDIT_OTHERS_PRODUCTS,
                    caps::DELETE_PRODUCTS,
                ]),
            ),
            (roles::AUTHOR.to_string(), owned(&[caps::READ, caps::EDIT_PRODUCTS])),
            (roles::CUSTOMER.to_string(), owned(&[caps::READ])),
            (roles::SUBSCRIBER.to_string(), owned(&[caps::READ])),
        ]);

        Self {
            role_priority: owned(&[
                roles::ADMINISTRATOR,
                roles::EDITOR,
                roles::AUTHOR,
                roles::CUSTOMER,
                roles::SUBSCRIBER,
            ]),
            fallback_role: roles::SUBSCRIBER.to_string(),
            fallback_set: subscriber,
            capability_sets,
            menu,
            role_grants,
        }
    }

    pub fn role_priority(&self) -> &[String] {
        &self.role_priority
    }

    /// Role assumed for users with no roles at all.
    pub fn fallback_role(&self) -> &str {
        &self.fallback_role
    }

    /// Capability set for roles the table does not know.
    pub fn fallback_set(&self) -> &CapabilitySet {
        &self.fallback_set
    }

    pub fn capability_set(&self, role: &str) -> Option<&CapabilitySet> {
        self.capability_sets.get(role)
    }

    pub fn menu_item(&self, key: &str) -> Option<&MenuItem> {
        self.menu.get(key)
    }

    pub fn grants(&self, role: &str) -> &[String] {
        self.role_grants.get(role).map(Vec::as_slice).unwrap_or_default()
    }
}
