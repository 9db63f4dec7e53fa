//! Principals and membership join records
//!
//! Both many-to-many relations are stored as explicit join records keyed by
//! the pair of ids. A pair appears at most once; the store enforces that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated principal handed in by the caller.
///
/// Only the id takes part in authorization; the name is carried for logs.
///
/// # Examples
///
/// ```
/// use rakshak_core::User;
///
/// let user = User::new("alice");
/// assert_eq!(user.name, "alice");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    /// Opaque user ID
    pub id: Uuid,

    /// Display name
    pub name: String,
}

impl User {
    /// Creates a user with a fresh UUID v7 ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7(), name)
    }

    /// Wraps an existing user ID, e.g. one taken from a session.
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Membership edge linking a user to a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRole {
    /// User ID
    pub user_id: Uuid,

    /// Role ID
    pub role_id: Uuid,

    /// When the role was assigned
    pub assigned_at: DateTime<Utc>,
}

impl UserRole {
    /// Creates a new membership edge stamped with the current time.
    pub fn new(user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            user_id,
            role_id,
            assigned_at: Utc::now(),
        }
    }

    /// The unique pair identifying this edge.
    pub fn key(&self) -> (Uuid, Uuid) {
        (self.user_id, self.role_id)
    }
}

/// Grant edge linking a role to an ability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleAbility {
    /// Role ID
    pub role_id: Uuid,

    /// Ability ID
    pub ability_id: Uuid,

    /// When the ability was granted
    pub granted_at: DateTime<Utc>,
}

impl RoleAbility {
    /// Creates a new grant edge stamped with the current time.
    pub fn new(role_id: Uuid, ability_id: Uuid) -> Self {
        Self {
            role_id,
            ability_id,
            granted_at: Utc::now(),
        }
    }

    /// The unique pair identifying this edge.
    pub fn key(&self) -> (Uuid, Uuid) {
        (self.role_id, self.ability_id)
    }
}
