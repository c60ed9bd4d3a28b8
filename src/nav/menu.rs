use serde::Serialize;

use crate::types::user::{Identity, Role};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub path: String,
    pub label: String,
    /// `None` shows the entry to everyone.
    pub roles: Option<Vec<Role>>,
}

impl MenuEntry {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            roles: None,
        }
    }

    pub fn restricted(path: impl Into<String>, label: impl Into<String>, roles: &[Role]) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            roles: Some(roles.to_vec()),
        }
    }

    pub fn is_visible_to(&self, role: Option<Role>) -> bool {
        match (&self.roles, role) {
            (None, _) => true,
            (Some(roles), Some(role)) => roles.contains(&role),
            (Some(_), None) => false,
        }
    }
}

/// Entries the given role may see, in their original order.
pub fn visible_entries(entries: &[MenuEntry], role: Option<Role>) -> Vec<MenuEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_visible_to(role))
        .cloned()
        .collect()
}

pub fn public_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("/", "Home"),
        MenuEntry::new("/warehouses", "Warehouses"),
        MenuEntry::new("/about", "About us"),
        MenuEntry::new("/contact", "Contact"),
    ]
}

pub fn customer_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("/profile", "Profile"),
        MenuEntry::new("/rentals", "My rentals"),
        MenuEntry::new("/appointments", "Appointments"),
        MenuEntry::new("/feedback", "Feedback"),
        MenuEntry::new("/payments", "Payments"),
    ]
}

pub fn crm_menu() -> Vec<MenuEntry> {
    use Role::{Admin, Manager, Sales};

    vec![
        MenuEntry::restricted("/crm", "Dashboard", &[Admin, Sales, Manager]),
        MenuEntry::restricted("/crm/warehouses", "Warehouses", &[Admin, Manager]),
        MenuEntry::restricted("/crm/lots", "Lots", &[Admin, Manager]),
        MenuEntry::restricted("/crm/contracts", "Contracts", &[Admin, Sales]),
        MenuEntry::restricted("/crm/rentals", "Rentals", &[Admin, Sales, Manager]),
        MenuEntry::restricted("/crm/appointments", "Appointments", &[Admin, Sales]),
        MenuEntry::restricted("/crm/payments", "Payments", &[Admin, Manager]),
        MenuEntry::restricted("/crm/users", "Users", &[Admin]),
    ]
}

/// Full navigation for the current identity. Staff see the CRM entries their
/// role allows; everyone signed in sees the customer area.
pub fn menu_for(identity: Option<&Identity>) -> Vec<MenuEntry> {
    let mut entries = public_menu();

    match identity {
        None => {
            entries.push(MenuEntry::new("/login", "Login"));
            entries.push(MenuEntry::new("/register", "Register"));
        }
        Some(identity) => {
            entries.extend(customer_menu());
            entries.extend(visible_entries(&crm_menu(), identity.role));
        }
    }

    entries
}
