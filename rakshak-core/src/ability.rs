//! Ability domain model
//!
//! An ability is the atomic, named permission unit (e.g. `edit-post`).
//! Abilities are granted to roles, never directly to users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named permission that can be granted to roles.
///
/// The `name` is the unique, human-readable key callers use in checks.
///
/// # Examples
///
/// ```
/// use rakshak_core::Ability;
///
/// let ability = Ability::new("edit-post").with_label("Edit posts");
/// assert_eq!(ability.name, "edit-post");
/// assert!(ability.active);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ability {
    /// Unique ability ID
    pub id: Uuid,

    /// Unique name used in checks
    pub name: String,

    /// Display label for admin screens
    pub label: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Whether the ability is active. An inactive ability is never granted.
    pub active: bool,

    /// When the ability was created
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Ability {
    /// Creates a new active ability with a fresh UUID v7 ID.
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

    /// Mark the ability inactive.
    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self.updated_at = Utc::now();
        self
    }

    /// Mark the ability active again.
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
