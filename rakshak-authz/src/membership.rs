//! Membership operations
//!
//! Mutations and listings over the user-role and role-ability relations,
//! plus role and ability administration. Name-or-id arguments are resolved
//! to the stored entity first; an unresolved reference fails with
//! `RoleNotFound`/`AbilityNotFound` and is never swallowed.

use std::sync::Arc;

use rakshak_core::{Ability, AbilityRef, RbacError, RbacResult, Role, RoleRef, User};
use rakshak_store::{RbacStore, Removed};
use tracing::{instrument, warn};
use uuid::Uuid;

/// Membership and administration service over an [`RbacStore`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rakshak_authz::Membership;
/// use rakshak_core::{Role, User};
/// use rakshak_store::MemoryStore;
///
/// # async fn example() -> rakshak_core::RbacResult<()> {
/// let membership = Membership::new(Arc::new(MemoryStore::new()));
/// membership.create_role(Role::new("site_manager")).await?;
///
/// let user = User::new("alice");
/// assert!(membership.assign_role(&user, "site_manager").await?);
/// assert!(!membership.assign_role(&user, "site_manager").await?); // already held
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Membership {
    store: Arc<dyn RbacStore>,
}

impl std::fmt::Debug for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Membership").finish_non_exhaustive()
    }
}

impl Membership {
    /// Create a membership service over a store.
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self { store }
    }

    /// Create a role. Fails with `DuplicateRole` if the name is taken.
    pub async fn create_role(&self, role: Role) -> RbacResult<Role> {
        self.store.insert_role(role).await
    }

    /// Create an ability. Fails with `DuplicateAbility` if the name is taken.
    pub async fn create_ability(&self, ability: Ability) -> RbacResult<Ability> {
        self.store.insert_ability(ability).await
    }

    /// Return the role with this name, creating it if missing.
    ///
    /// Idempotent; a concurrent insert of the same name is treated as
    /// already present.
    pub async fn ensure_role(&self, role: Role) -> RbacResult<Role> {
        let name = RoleRef::from(role.name.as_str());
        if let Some(existing) = self.store.find_role(&name).await? {
            return Ok(existing);
        }

        match self.store.insert_role(role).await {
            Ok(created) => Ok(created),
            Err(RbacError::DuplicateRole(_)) => self
                .store
                .find_role(&name)
                .await?
                .ok_or_else(|| name.not_found()),
            Err(e) => Err(e),
        }
    }

    /// Update a role's name, label, description or active flag.
    ///
    /// Memberships and grants are kept. A rename must not collide with
    /// another role.
    #[instrument(skip_all, fields(role_id = %role.id))]
    pub async fn update_role(&self, role: Role) -> RbacResult<Role> {
        self.store.update_role(role).await
    }

    /// Update an ability's name, label, description or active flag.
    #[instrument(skip_all, fields(ability_id = %ability.id))]
    pub async fn update_ability(&self, ability: Ability) -> RbacResult<Ability> {
        self.store.update_ability(ability).await
    }

    /// Look up a role by entity, id or name.
    pub async fn find_role(&self, role: impl Into<RoleRef>) -> RbacResult<Option<Role>> {
        self.store.find_role(&role.into()).await
    }

    /// Look up an ability by entity, id or name.
    pub async fn find_ability(
        &self,
        ability: impl Into<AbilityRef>,
    ) -> RbacResult<Option<Ability>> {
        self.store.find_ability(&ability.into()).await
    }

    /// All roles, sorted by name.
    pub async fn list_roles(&self) -> RbacResult<Vec<Role>> {
        self.store.list_roles().await
    }

    /// All abilities, sorted by name.
    pub async fn list_abilities(&self) -> RbacResult<Vec<Ability>> {
        self.store.list_abilities().await
    }

    /// Delete a role, removing its memberships and ability grants with it.
    pub async fn delete_role(&self, role: impl Into<RoleRef>) -> RbacResult<Removed<Role>> {
        let role = self.resolve_role(role.into()).await?;
        self.store.delete_role(role.id).await
    }

    /// Delete an ability, removing its role grants with it.
    pub async fn delete_ability(
        &self,
        ability: impl Into<AbilityRef>,
    ) -> RbacResult<Removed<Ability>> {
        let ability = self.resolve_ability(ability.into()).await?;
        self.store.delete_ability(ability.id).await
    }

    /// Assign a role to a user.
    ///
    /// Idempotent: returns `true` if the membership was added and `false`
    /// if the user already held the role.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn assign_role(&self, user: &User, role: impl Into<RoleRef>) -> RbacResult<bool> {
        let role = self.resolve_role(role.into()).await?;
        self.store.attach_role(user.id, role.id).await
    }

    /// Retract a role from a user.
    ///
    /// Returns `false` if the user did not hold the role.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn retract_role(&self, user: &User, role: impl Into<RoleRef>) -> RbacResult<bool> {
        let role = self.resolve_role(role.into()).await?;
        self.store.detach_role(user.id, role.id).await
    }

    /// Grant an ability to a role.
    ///
    /// Idempotent: returns `true` if the grant was added and `false` if the
    /// role already had the ability.
    #[instrument(skip_all)]
    pub async fn add_ability(
        &self,
        role: impl Into<RoleRef>,
        ability: impl Into<AbilityRef>,
    ) -> RbacResult<bool> {
        let role = self.resolve_role(role.into()).await?;
        let ability = self.resolve_ability(ability.into()).await?;
        self.store.attach_ability(role.id, ability.id).await
    }

    /// Retract an ability from a role.
    ///
    /// Returns `false` if the role did not have the ability.
    #[instrument(skip_all)]
    pub async fn retract_ability(
        &self,
        role: impl Into<RoleRef>,
        ability: impl Into<AbilityRef>,
    ) -> RbacResult<bool> {
        let role = self.resolve_role(role.into()).await?;
        let ability = self.resolve_ability(ability.into()).await?;
        self.store.detach_ability(role.id, ability.id).await
    }

    /// Roles held by a user. Empty if none are assigned.
    pub async fn roles(&self, user: &User) -> RbacResult<Vec<Role>> {
        self.store.roles_of(user.id).await
    }

    /// Abilities granted to a role.
    pub async fn abilities(&self, role: impl Into<RoleRef>) -> RbacResult<Vec<Ability>> {
        let role = self.resolve_role(role.into()).await?;
        self.store.abilities_of(role.id).await
    }

    /// IDs of the users holding a role.
    pub async fn users_with_role(&self, role: impl Into<RoleRef>) -> RbacResult<Vec<Uuid>> {
        let role = self.resolve_role(role.into()).await?;
        self.store.users_of(role.id).await
    }

    async fn resolve_role(&self, role: RoleRef) -> RbacResult<Role> {
        match self.store.find_role(&role).await? {
            Some(found) => Ok(found),
            None => {
                warn!(role = %role, "Role reference did not resolve");
                Err(role.not_found())
            }
        }
    }

    async fn resolve_ability(&self, ability: AbilityRef) -> RbacResult<Ability> {
        match self.store.find_ability(&ability).await? {
            Some(found) => Ok(found),
            None => {
                warn!(ability = %ability, "Ability reference did not resolve");
                Err(ability.not_found())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rakshak_store::MemoryStore;

    fn membership() -> Membership {
        Membership::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_assign_role_by_entity_and_name() {
        let membership = membership();
        let role1 = membership.create_role(Role::new("site_manager")).await.unwrap();
        let role2 = membership.create_role(Role::new("hr_manager")).await.unwrap();
        let user = User::new("alice");
        assert!(membership.roles(&user).await.unwrap().is_empty());

        membership.assign_role(&user, &role1).await.unwrap();
        assert_eq!(membership.roles(&user).await.unwrap().len(), 1);

        membership.assign_role(&user, role2.name.as_str()).await.unwrap();
        assert_eq!(membership.roles(&user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_assign_role_twice_keeps_one_edge() {
        let membership = membership();
        let role = membership.create_role(Role::new("editor")).await.unwrap();
        let user = User::new("alice");

        assert!(membership.assign_role(&user, &role).await.unwrap());
        assert!(!membership.assign_role(&user, "editor").await.unwrap());
        assert_eq!(membership.roles(&user).await.unwrap(), vec![role]);
    }

    #[tokio::test]
    async fn test_assign_unknown_role_name() {
        let membership = membership();
        let user = User::new("alice");

        let err = membership.assign_role(&user, "ghost").await.unwrap_err();
        assert_eq!(err, RbacError::RoleNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_add_ability_by_entity_and_name() {
        let membership = membership();
        let role = membership.create_role(Role::new("editor")).await.unwrap();
        let edit = membership.create_ability(Ability::new("edit-post")).await.unwrap();
        membership.create_ability(Ability::new("view-post")).await.unwrap();

        assert!(membership.add_ability(&role, &edit).await.unwrap());
        assert!(membership.add_ability("editor", "view-post").await.unwrap());
        assert!(!membership.add_ability(&role, "edit-post").await.unwrap());

        let names: Vec<String> = membership
            .abilities(&role)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["edit-post", "view-post"]);
    }

    #[tokio::test]
    async fn test_add_unknown_ability() {
        let membership = membership();
        let role = membership.create_role(Role::new("editor")).await.unwrap();

        let err = membership.add_ability(&role, "ghost").await.unwrap_err();
        assert_eq!(err, RbacError::AbilityNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_retract_role() {
        let membership = membership();
        membership.create_role(Role::new("editor")).await.unwrap();
        let user = User::new("alice");

        assert!(!membership.retract_role(&user, "editor").await.unwrap());
        membership.assign_role(&user, "editor").await.unwrap();
        assert!(membership.retract_role(&user, "editor").await.unwrap());
        assert!(membership.roles(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_role_by_name_cascades() {
        let membership = membership();
        membership.create_role(Role::new("editor")).await.unwrap();
        let user = User::new("alice");
        membership.assign_role(&user, "editor").await.unwrap();

        let removed = membership.delete_role("editor").await.unwrap();
        assert_eq!(removed.edges, 1);
        assert!(membership.roles(&user).await.unwrap().is_empty());
        assert!(membership.find_role("editor").await.unwrap().is_none());

        let err = membership.delete_role("editor").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_users_with_role() {
        let membership = membership();
        membership.create_role(Role::new("editor")).await.unwrap();
        let alice = User::new("alice");
        let bob = User::new("bob");
        membership.assign_role(&alice, "editor").await.unwrap();
        membership.assign_role(&bob, "editor").await.unwrap();

        let users = membership.users_with_role("editor").await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.contains(&alice.id));
        assert!(users.contains(&bob.id));
    }

    #[tokio::test]
    async fn test_ensure_role_is_idempotent() {
        let membership = membership();
        let first = membership.ensure_role(Role::new("super")).await.unwrap();
        let second = membership.ensure_role(Role::new("super")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(membership.list_roles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_role_keeps_memberships() {
        let membership = membership();
        let role = membership.create_role(Role::new("editor")).await.unwrap();
        let user = User::new("alice");
        membership.assign_role(&user, "editor").await.unwrap();

        let renamed = Role {
            name: "writer".to_string(),
            ..role
        };
        membership.update_role(renamed).await.unwrap();

        assert!(membership.find_role("editor").await.unwrap().is_none());
        let err = membership.assign_role(&user, "editor").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(membership.users_with_role("writer").await.unwrap(), vec![user.id]);
    }
}
