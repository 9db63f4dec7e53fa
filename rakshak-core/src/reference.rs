//! Name-or-id references
//!
//! Callers name roles and abilities either by entity (`&Role`, an id) or by
//! their unique name (`"site_manager"`). These references are resolved to a
//! canonical entity at the API boundary so that matching is always done by
//! id internally.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ability::Ability;
use crate::error::{RbacError, RbacResult};
use crate::role::Role;

/// Reference to a role by id or by unique name.
///
/// # Examples
///
/// ```
/// use rakshak_core::{Role, RoleRef};
///
/// let role = Role::new("editor");
/// assert_eq!(RoleRef::from(&role), RoleRef::Id(role.id));
/// assert_eq!(RoleRef::from("editor"), RoleRef::Name("editor".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleRef {
    /// Match by role ID
    Id(Uuid),
    /// Match by unique role name
    Name(String),
}

/// Reference to an ability by id or by unique name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AbilityRef {
    /// Match by ability ID
    Id(Uuid),
    /// Match by unique ability name
    Name(String),
}

impl RoleRef {
    /// Check whether this reference designates the given role.
    pub fn matches(&self, role: &Role) -> bool {
        match self {
            RoleRef::Id(id) => role.id == *id,
            RoleRef::Name(name) => role.name == name.trim(),
        }
    }

    /// Error to report when this reference resolves to nothing.
    pub fn not_found(&self) -> RbacError {
        RbacError::RoleNotFound(self.to_string())
    }
}

impl AbilityRef {
    /// Check whether this reference designates the given ability.
    pub fn matches(&self, ability: &Ability) -> bool {
        match self {
            AbilityRef::Id(id) => ability.id == *id,
            AbilityRef::Name(name) => ability.name == name.trim(),
        }
    }

    /// Error to report when this reference resolves to nothing.
    pub fn not_found(&self) -> RbacError {
        RbacError::AbilityNotFound(self.to_string())
    }
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRef::Id(id) => write!(f, "{}", id),
            RoleRef::Name(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for AbilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityRef::Id(id) => write!(f, "{}", id),
            AbilityRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<&Role> for RoleRef {
    fn from(role: &Role) -> Self {
        RoleRef::Id(role.id)
    }
}

impl From<Uuid> for RoleRef {
    fn from(id: Uuid) -> Self {
        RoleRef::Id(id)
    }
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        RoleRef::Name(name.to_string())
    }
}

impl From<String> for RoleRef {
    fn from(name: String) -> Self {
        RoleRef::Name(name)
    }
}

impl From<&String> for RoleRef {
    fn from(name: &String) -> Self {
        RoleRef::Name(name.clone())
    }
}

impl From<&Ability> for AbilityRef {
    fn from(ability: &Ability) -> Self {
        AbilityRef::Id(ability.id)
    }
}

impl From<Uuid> for AbilityRef {
    fn from(id: Uuid) -> Self {
        AbilityRef::Id(id)
    }
}

impl From<&str> for AbilityRef {
    fn from(name: &str) -> Self {
        AbilityRef::Name(name.to_string())
    }
}

impl From<String> for AbilityRef {
    fn from(name: String) -> Self {
        AbilityRef::Name(name)
    }
}

impl From<&String> for AbilityRef {
    fn from(name: &String) -> Self {
        AbilityRef::Name(name.clone())
    }
}

/// Validate and normalize a role or ability name.
///
/// Names are trimmed and must not be empty.
///
/// # Examples
///
/// ```
/// use rakshak_core::reference::normalize_name;
///
/// assert_eq!(normalize_name(" super ").unwrap(), "super");
/// assert!(normalize_name("   ").is_err());
/// ```
pub fn normalize_name(name: &str) -> RbacResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RbacError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ref_matching() {
        let role = Role::new("site_manager");
        assert!(RoleRef::from(&role).matches(&role));
        assert!(RoleRef::from("site_manager").matches(&role));
        assert!(RoleRef::from(" site_manager ").matches(&role));
        assert!(!RoleRef::from("hr_manager").matches(&role));
        assert!(!RoleRef::from(Uuid::now_v7()).matches(&role));
    }

    #[test]
    fn test_ability_ref_matching() {
        let ability = Ability::new("edit-ability");
        assert!(AbilityRef::from(&ability).matches(&ability));
        assert!(AbilityRef::from(ability.name.clone()).matches(&ability));
        assert!(!AbilityRef::from("view-ability").matches(&ability));
    }

    #[test]
    fn test_not_found_errors() {
        assert_eq!(
            RoleRef::from("ghost").not_found(),
            RbacError::RoleNotFound("ghost".to_string())
        );
        assert_eq!(
            AbilityRef::from("ghost").not_found(),
            RbacError::AbilityNotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("editor").unwrap(), "editor");
        assert_eq!(
            normalize_name(""),
            Err(RbacError::InvalidName(String::new()))
        );
    }
}
