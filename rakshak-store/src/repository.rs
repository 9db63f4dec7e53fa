//! Persistence interface
//!
//! This module defines the repository abstraction the authorization core
//! talks to. Any durable backend (SQL, KV, ...) implements [`RbacStore`];
//! the crate ships [`crate::MemoryStore`] for tests and single-process hosts.

use async_trait::async_trait;
use rakshak_core::{Ability, AbilityRef, RbacResult, Role, RoleRef};
use uuid::Uuid;

/// Store statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of roles
    pub roles: usize,
    /// Number of abilities
    pub abilities: usize,
    /// Number of user-role edges
    pub user_roles: usize,
    /// Number of role-ability edges
    pub role_abilities: usize,
}

/// Outcome of a cascading delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed<T> {
    /// The deleted entity
    pub entity: T,
    /// Number of membership edges removed along with it
    pub edges: usize,
}

/// Repository trait for roles, abilities and their membership edges.
///
/// Implementations must:
/// - enforce uniqueness of role and ability names
/// - store each `(user, role)` and `(role, ability)` pair at most once
/// - make every mutation atomic, so readers observe either the pre- or the
///   post-state, never a half-written edge
/// - cascade deletes: removing a role drops its user and ability edges,
///   removing an ability drops its role edges
#[async_trait]
pub trait RbacStore: Send + Sync {
    /// Insert a new role.
    ///
    /// Fails with `DuplicateRole` if the name is taken and `InvalidName`
    /// if it is blank.
    async fn insert_role(&self, role: Role) -> RbacResult<Role>;

    /// Insert a new ability.
    ///
    /// Fails with `DuplicateAbility` if the name is taken and `InvalidName`
    /// if it is blank.
    async fn insert_ability(&self, ability: Ability) -> RbacResult<Ability>;

    /// Replace a stored role, matched by id.
    ///
    /// `created_at` is kept from the stored record and `updated_at` is
    /// bumped. Fails with `RoleNotFound` for an unknown id and with
    /// `DuplicateRole` if a rename collides with another role.
    async fn update_role(&self, role: Role) -> RbacResult<Role>;

    /// Replace a stored ability, matched by id. Same rules as
    /// [`RbacStore::update_role`].
    async fn update_ability(&self, ability: Ability) -> RbacResult<Ability>;

    /// Look up a role by id or unique name.
    async fn find_role(&self, role: &RoleRef) -> RbacResult<Option<Role>>;

    /// Look up an ability by id or unique name.
    async fn find_ability(&self, ability: &AbilityRef) -> RbacResult<Option<Ability>>;

    /// All roles, sorted by name.
    async fn list_roles(&self) -> RbacResult<Vec<Role>>;

    /// All abilities, sorted by name.
    async fn list_abilities(&self) -> RbacResult<Vec<Ability>>;

    /// Delete a role together with all its edges.
    async fn delete_role(&self, role_id: Uuid) -> RbacResult<Removed<Role>>;

    /// Delete an ability together with all its role edges.
    async fn delete_ability(&self, ability_id: Uuid) -> RbacResult<Removed<Ability>>;

    /// Roles held by a user, sorted by name. Empty if none.
    async fn roles_of(&self, user_id: Uuid) -> RbacResult<Vec<Role>>;

    /// Abilities granted to a role, sorted by name. Empty if none.
    async fn abilities_of(&self, role_id: Uuid) -> RbacResult<Vec<Ability>>;

    /// Users holding a role.
    async fn users_of(&self, role_id: Uuid) -> RbacResult<Vec<Uuid>>;

    /// Check whether a role grants an ability.
    async fn role_grants(&self, role_id: Uuid, ability_id: Uuid) -> RbacResult<bool>;

    /// Add a user-role edge.
    ///
    /// Returns `true` if the edge was inserted, `false` if it already
    /// existed. Fails with `RoleNotFound` for an unknown role id.
    async fn attach_role(&self, user_id: Uuid, role_id: Uuid) -> RbacResult<bool>;

    /// Remove a user-role edge. Returns `true` if an edge was removed.
    async fn detach_role(&self, user_id: Uuid, role_id: Uuid) -> RbacResult<bool>;

    /// Add a role-ability edge.
    ///
    /// Returns `true` if the edge was inserted, `false` if it already
    /// existed. Fails with `RoleNotFound`/`AbilityNotFound` for unknown ids.
    async fn attach_ability(&self, role_id: Uuid, ability_id: Uuid) -> RbacResult<bool>;

    /// Remove a role-ability edge. Returns `true` if an edge was removed.
    async fn detach_ability(&self, role_id: Uuid, ability_id: Uuid) -> RbacResult<bool>;

    /// Get store statistics.
    async fn stats(&self) -> StoreStats;
}
