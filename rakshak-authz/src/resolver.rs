//! Authorization resolver
//!
//! Answers role and ability membership questions over the live store state.
//! Every query is total: an unknown role or ability, an unassigned user and
//! a store failure all yield `false`. Inactive roles and abilities grant
//! nothing. Nothing is cached between calls, so a grant or revoke is visible
//! to the very next query.

use std::sync::Arc;

use rakshak_core::{AbilityRef, RbacConfig, RbacResult, Role, RoleRef, User};
use rakshak_store::RbacStore;
use tracing::warn;

/// Role and ability queries for a principal.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rakshak_authz::{Membership, Resolver};
/// use rakshak_core::{Ability, RbacConfig, Role, User};
/// use rakshak_store::{MemoryStore, RbacStore};
///
/// # async fn example() -> rakshak_core::RbacResult<()> {
/// let store: Arc<dyn RbacStore> = Arc::new(MemoryStore::new());
/// let membership = Membership::new(store.clone());
/// let resolver = Resolver::new(store, &RbacConfig::default());
///
/// let role = membership.create_role(Role::new("editor")).await?;
/// let ability = membership.create_ability(Ability::new("edit-post")).await?;
/// membership.add_ability(&role, &ability).await?;
///
/// let user = User::new("alice");
/// membership.assign_role(&user, &role).await?;
/// assert!(resolver.has_ability(&user, "edit-post").await);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn RbacStore>,
    super_role: String,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("super_role", &self.super_role)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver over a store.
    pub fn new(store: Arc<dyn RbacStore>, config: &RbacConfig) -> Self {
        Self {
            store,
            super_role: config.super_role.clone(),
        }
    }

    /// Name of the role that makes its holders super-users.
    pub fn super_role(&self) -> &str {
        &self.super_role
    }

    /// Check whether the user holds a role, given by entity, id or name.
    pub async fn has_role(&self, user: &User, role: impl Into<RoleRef>) -> bool {
        let role: RoleRef = role.into();
        self.has_any_role(user, [role]).await
    }

    /// Check whether the user holds at least one of the given roles.
    ///
    /// The references are matched against a single snapshot of the user's
    /// active roles. An empty list yields `false`.
    pub async fn has_any_role<I, R>(&self, user: &User, roles: I) -> bool
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleRef>,
    {
        let wanted: Vec<RoleRef> = roles.into_iter().map(Into::into).collect();
        if wanted.is_empty() {
            return false;
        }

        match self.held_roles(user).await {
            Some(held) => wanted
                .iter()
                .any(|reference| held.iter().any(|role| reference.matches(role))),
            None => false,
        }
    }

    /// Check whether any role held by the user grants the ability.
    ///
    /// This does not apply the super-user bypass; that belongs to the gate.
    pub async fn has_ability(&self, user: &User, ability: impl Into<AbilityRef>) -> bool {
        let reference: AbilityRef = ability.into();
        let ability = match self.store.find_ability(&reference).await {
            Ok(Some(ability)) if ability.active => ability,
            Ok(_) => return false,
            Err(e) => {
                warn!(error = %e, ability = %reference, "Ability lookup failed, treating as not granted");
                return false;
            }
        };

        let held = match self.held_roles(user).await {
            Some(held) => held,
            None => return false,
        };

        for role in &held {
            match self.store.role_grants(role.id, ability.id).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, role_id = %role.id, "Grant lookup failed, skipping role");
                }
            }
        }
        false
    }

    /// Check whether the user holds the super-user role.
    ///
    /// Always evaluated against the live membership state.
    pub async fn is_super_user(&self, user: &User) -> bool {
        self.has_role(user, self.super_role.as_str()).await
    }

    /// Check whether a role grants an ability.
    pub async fn role_has_ability(
        &self,
        role: impl Into<RoleRef>,
        ability: impl Into<AbilityRef>,
    ) -> bool {
        self.grant_exists(&role.into(), &ability.into())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Grant lookup failed, treating as not granted");
                false
            })
    }

    async fn grant_exists(&self, role: &RoleRef, ability: &AbilityRef) -> RbacResult<bool> {
        let role = self.store.find_role(role).await?;
        let ability = self.store.find_ability(ability).await?;
        match (role, ability) {
            (Some(role), Some(ability)) if role.active && ability.active => {
                self.store.role_grants(role.id, ability.id).await
            }
            _ => Ok(false),
        }
    }

    /// Active roles of the user; `None` if the store failed.
    async fn held_roles(&self, user: &User) -> Option<Vec<Role>> {
        match self.store.roles_of(user.id).await {
            Ok(roles) => Some(roles.into_iter().filter(|r| r.active).collect()),
            Err(e) => {
                warn!(error = %e, user_id = %user.id, "Role listing failed, treating as no roles");
                None
            }
        }
    }
}
