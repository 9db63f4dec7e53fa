//! In-memory store implementation
//!
//! Keeps every table behind a single lock so each mutation, including a
//! cascading delete, is applied atomically.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rakshak_core::reference::normalize_name;
use rakshak_core::{
    Ability, AbilityRef, RbacError, RbacResult, Role, RoleAbility, RoleRef, UserRole,
};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::repository::{RbacStore, Removed, StoreStats};

#[derive(Debug, Default)]
struct Tables {
    roles: HashMap<Uuid, Role>,
    abilities: HashMap<Uuid, Ability>,
    user_roles: HashMap<(Uuid, Uuid), UserRole>,
    role_abilities: HashMap<(Uuid, Uuid), RoleAbility>,
}

impl Tables {
    fn role(&self, reference: &RoleRef) -> Option<&Role> {
        match reference {
            RoleRef::Id(id) => self.roles.get(id),
            RoleRef::Name(_) => self.roles.values().find(|r| reference.matches(r)),
        }
    }

    fn ability(&self, reference: &AbilityRef) -> Option<&Ability> {
        match reference {
            AbilityRef::Id(id) => self.abilities.get(id),
            AbilityRef::Name(_) => self.abilities.values().find(|a| reference.matches(a)),
        }
    }
}

/// In-memory [`RbacStore`].
///
/// Clones share the same underlying tables. Suitable for single-process
/// hosts and tests; durable deployments implement [`RbacStore`] over their
/// own database.
///
/// # Example
///
/// ```rust
/// use rakshak_core::{Role, RoleRef};
/// use rakshak_store::{MemoryStore, RbacStore};
///
/// # async fn example() -> rakshak_core::RbacResult<()> {
/// let store = MemoryStore::new();
/// let role = store.insert_role(Role::new("editor")).await?;
/// assert!(store.find_role(&RoleRef::from("editor")).await?.is_some());
/// assert!(store.attach_role(uuid::Uuid::now_v7(), role.id).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RbacStore for MemoryStore {
    async fn insert_role(&self, mut role: Role) -> RbacResult<Role> {
        role.name = normalize_name(&role.name)?;

        let mut tables = self.tables.write().await;
        if tables.roles.contains_key(&role.id)
            || tables.roles.values().any(|r| r.name == role.name)
        {
            return Err(RbacError::DuplicateRole(role.name));
        }
        tables.roles.insert(role.id, role.clone());

        info!(role_id = %role.id, role = %role.name, "Role created");
        Ok(role)
    }

    async fn insert_ability(&self, mut ability: Ability) -> RbacResult<Ability> {
        ability.name = normalize_name(&ability.name)?;

        let mut tables = self.tables.write().await;
        if tables.abilities.contains_key(&ability.id)
            || tables.abilities.values().any(|a| a.name == ability.name)
        {
            return Err(RbacError::DuplicateAbility(ability.name));
        }
        tables.abilities.insert(ability.id, ability.clone());

        info!(ability_id = %ability.id, ability = %ability.name, "Ability created");
        Ok(ability)
    }

    async fn update_role(&self, mut role: Role) -> RbacResult<Role> {
        role.name = normalize_name(&role.name)?;

        let mut tables = self.tables.write().await;
        let created_at = match tables.roles.get(&role.id) {
            Some(stored) => stored.created_at,
            None => return Err(RbacError::RoleNotFound(role.id.to_string())),
        };
        if tables
            .roles
            .values()
            .any(|r| r.id != role.id && r.name == role.name)
        {
            return Err(RbacError::DuplicateRole(role.name));
        }

        role.created_at = created_at;
        role.updated_at = Utc::now();
        tables.roles.insert(role.id, role.clone());

        info!(role_id = %role.id, role = %role.name, active = role.active, "Role updated");
        Ok(role)
    }

    async fn update_ability(&self, mut ability: Ability) -> RbacResult<Ability> {
        ability.name = normalize_name(&ability.name)?;

        let mut tables = self.tables.write().await;
        let created_at = match tables.abilities.get(&ability.id) {
            Some(stored) => stored.created_at,
            None => return Err(RbacError::AbilityNotFound(ability.id.to_string())),
        };
        if tables
            .abilities
            .values()
            .any(|a| a.id != ability.id && a.name == ability.name)
        {
            return Err(RbacError::DuplicateAbility(ability.name));
        }

        ability.created_at = created_at;
        ability.updated_at = Utc::now();
        tables.abilities.insert(ability.id, ability.clone());

        info!(
            ability_id = %ability.id,
            ability = %ability.name,
            active = ability.active,
            "Ability updated"
        );
        Ok(ability)
    }

    async fn find_role(&self, role: &RoleRef) -> RbacResult<Option<Role>> {
        Ok(self.tables.read().await.role(role).cloned())
    }

    async fn find_ability(&self, ability: &AbilityRef) -> RbacResult<Option<Ability>> {
        Ok(self.tables.read().await.ability(ability).cloned())
    }

    async fn list_roles(&self) -> RbacResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn list_abilities(&self) -> RbacResult<Vec<Ability>> {
        let tables = self.tables.read().await;
        let mut abilities: Vec<Ability> = tables.abilities.values().cloned().collect();
        abilities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(abilities)
    }

    async fn delete_role(&self, role_id: Uuid) -> RbacResult<Removed<Role>> {
        let mut tables = self.tables.write().await;
        let role = tables
            .roles
            .remove(&role_id)
            .ok_or_else(|| RbacError::RoleNotFound(role_id.to_string()))?;

        let before = tables.user_roles.len() + tables.role_abilities.len();
        tables.user_roles.retain(|(_, r), _| *r != role_id);
        tables.role_abilities.retain(|(r, _), _| *r != role_id);
        let edges = before - (tables.user_roles.len() + tables.role_abilities.len());

        info!(role_id = %role_id, role = %role.name, edges, "Role deleted");
        Ok(Removed { entity: role, edges })
    }

    async fn delete_ability(&self, ability_id: Uuid) -> RbacResult<Removed<Ability>> {
        let mut tables = self.tables.write().await;
        let ability = tables
            .abilities
            .remove(&ability_id)
            .ok_or_else(|| RbacError::AbilityNotFound(ability_id.to_string()))?;

        let before = tables.role_abilities.len();
        tables.role_abilities.retain(|(_, a), _| *a != ability_id);
        let edges = before - tables.role_abilities.len();

        info!(ability_id = %ability_id, ability = %ability.name, edges, "Ability deleted");
        Ok(Removed {
            entity: ability,
            edges,
        })
    }

    async fn roles_of(&self, user_id: Uuid) -> RbacResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables
            .user_roles
            .keys()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, r)| tables.roles.get(r).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn abilities_of(&self, role_id: Uuid) -> RbacResult<Vec<Ability>> {
        let tables = self.tables.read().await;
        let mut abilities: Vec<Ability> = tables
            .role_abilities
            .keys()
            .filter(|(r, _)| *r == role_id)
            .filter_map(|(_, a)| tables.abilities.get(a).cloned())
            .collect();
        abilities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(abilities)
    }

    async fn users_of(&self, role_id: Uuid) -> RbacResult<Vec<Uuid>> {
        let tables = self.tables.read().await;
        let mut users: Vec<Uuid> = tables
            .user_roles
            .keys()
            .filter(|(_, r)| *r == role_id)
            .map(|(u, _)| *u)
            .collect();
        users.sort();
        Ok(users)
    }

    async fn role_grants(&self, role_id: Uuid, ability_id: Uuid) -> RbacResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .role_abilities
            .contains_key(&(role_id, ability_id)))
    }

    async fn attach_role(&self, user_id: Uuid, role_id: Uuid) -> RbacResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role_id) {
            return Err(RbacError::RoleNotFound(role_id.to_string()));
        }

        let edge = UserRole::new(user_id, role_id);
        if tables.user_roles.contains_key(&edge.key()) {
            return Ok(false);
        }
        tables.user_roles.insert(edge.key(), edge);

        debug!(user_id = %user_id, role_id = %role_id, "Role attached to user");
        Ok(true)
    }

    async fn detach_role(&self, user_id: Uuid, role_id: Uuid) -> RbacResult<bool> {
        let removed = self
            .tables
            .write()
            .await
            .user_roles
            .remove(&(user_id, role_id))
            .is_some();

        if removed {
            debug!(user_id = %user_id, role_id = %role_id, "Role detached from user");
        }
        Ok(removed)
    }

    async fn attach_ability(&self, role_id: Uuid, ability_id: Uuid) -> RbacResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role_id) {
            return Err(RbacError::RoleNotFound(role_id.to_string()));
        }
        if !tables.abilities.contains_key(&ability_id) {
            return Err(RbacError::AbilityNotFound(ability_id.to_string()));
        }

        let edge = RoleAbility::new(role_id, ability_id);
        if tables.role_abilities.contains_key(&edge.key()) {
            return Ok(false);
        }
        tables.role_abilities.insert(edge.key(), edge);

        debug!(role_id = %role_id, ability_id = %ability_id, "Ability granted to role");
        Ok(true)
    }

    async fn detach_ability(&self, role_id: Uuid, ability_id: Uuid) -> RbacResult<bool> {
        let removed = self
            .tables
            .write()
            .await
            .role_abilities
            .remove(&(role_id, ability_id))
            .is_some();

        if removed {
            debug!(role_id = %role_id, ability_id = %ability_id, "Ability retracted from role");
        }
        Ok(removed)
    }

    async fn stats(&self) -> StoreStats {
        let tables = self.tables.read().await;
        StoreStats {
            roles: tables.roles.len(),
            abilities: tables.abilities.len(),
            user_roles: tables.user_roles.len(),
            role_abilities: tables.role_abilities.len(),
        }
    }
}
