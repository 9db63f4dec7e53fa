//! Role domain model
//!
//! A role is a named bundle of abilities that can be assigned to users.
//! The abilities themselves live in `RoleAbility` join records; a `Role`
//! value only describes the role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of abilities assignable to users.
///
/// # Examples
///
/// ```
/// use rakshak_core::Role;
///
/// let role = Role::new("site_manager").with_label("Site Manager");
/// assert_eq!(role.name, "site_manager");
/// assert_eq!(role.display_name(), "Site Manager");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Unique role name
    pub name: String,

    /// Display label for admin screens
    pub label: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Whether the role is active.
    ///
    /// An inactive role stays assigned but grants nothing: its holders are
    /// answered as not holding it and its abilities are not reachable.
    pub active: bool,

    /// When the role was created
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new active role with a fresh UUID v7 ID.
    ///
    /// Surrounding whitespace is stripped from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into().trim().to_string(),
            label: None,
            description: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the role inactive.
    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self.updated_at = Utc::now();
        self
    }

    /// Mark the role active again.
    pub fn activate(mut self) -> Self {
        self.active = true;
        self.updated_at = Utc::now();
        self
    }

    /// Label if set, otherwise the name.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
