//! # Policy Gates
//!
//! Per-resource-type authorization rules and the gate that wraps them.
//!
//! A [`Policy`] decides an action on its resource type. A [`Gate`] wraps
//! any policy with the super-user before-hook: holders of the configured
//! super role are allowed every action before the policy is consulted.
//!
//! ```text
//! caller ─→ Gate::allows(user, action, resource)
//!             ├─ before: is_super_user(user)? ─→ allow
//!             └─ policy.check(...)            ─→ allow / deny
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use rakshak_core::{Ability, RbacConfig, RbacError, RbacResult, Role, User};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::PolicyAction;
use crate::resolver::Resolver;

/// A condition a user must satisfy for a policy rule to allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// User must hold this role.
    Role(String),
    /// User must hold at least one of these roles.
    AnyRole(Vec<String>),
    /// One of the user's roles must grant this ability.
    Ability(String),
}

impl Requirement {
    /// Evaluate the requirement for a user through the resolver.
    pub async fn is_met_by(&self, resolver: &Resolver, user: &User) -> bool {
        match self {
            Requirement::Role(name) => resolver.has_role(user, name.as_str()).await,
            Requirement::AnyRole(names) => {
                resolver
                    .has_any_role(user, names.iter().map(String::as_str))
                    .await
            }
            Requirement::Ability(name) => resolver.has_ability(user, name.as_str()).await,
        }
    }
}

/// Authorization rules for one resource type.
///
/// Implementations decide only the resource-specific rule; the super-user
/// bypass is applied by [`Gate`].
#[async_trait]
pub trait Policy: Send + Sync {
    /// The protected resource type.
    type Resource: Send + Sync;

    /// Short resource kind used in logs (e.g. `"ability"`).
    fn resource_kind(&self) -> &str;

    /// Decide whether the user may perform the action.
    ///
    /// `resource` is the target instance for `View`, `Update` and `Delete`.
    async fn check(
        &self,
        resolver: &Resolver,
        user: &User,
        action: PolicyAction,
        resource: Option<&Self::Resource>,
    ) -> bool;
}

/// Policy gating every action on one requirement, with per-action overrides.
///
/// # Example
///
/// ```
/// use rakshak_authz::{CapabilityPolicy, PolicyAction, Requirement};
///
/// struct Post;
///
/// let policy = CapabilityPolicy::<Post>::new("post", Requirement::Role("editor".into()))
///     .with_rule(PolicyAction::Index, Requirement::Ability("list-posts".into()));
///
/// assert_eq!(
///     policy.requirement(PolicyAction::Delete),
///     &Requirement::Role("editor".into())
/// );
/// ```
pub struct CapabilityPolicy<R> {
    kind: String,
    default: Requirement,
    rules: HashMap<PolicyAction, Requirement>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> CapabilityPolicy<R> {
    /// Create a policy applying `requirement` to every action.
    pub fn new(kind: impl Into<String>, requirement: Requirement) -> Self {
        Self {
            kind: kind.into(),
            default: requirement,
            rules: HashMap::new(),
            _resource: PhantomData,
        }
    }

    /// Override the requirement for a single action.
    pub fn with_rule(mut self, action: PolicyAction, requirement: Requirement) -> Self {
        self.rules.insert(action, requirement);
        self
    }

    /// The requirement applied to an action.
    pub fn requirement(&self, action: PolicyAction) -> &Requirement {
        self.rules.get(&action).unwrap_or(&self.default)
    }
}

impl<R> Clone for CapabilityPolicy<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            default: self.default.clone(),
            rules: self.rules.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> fmt::Debug for CapabilityPolicy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityPolicy")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("rules", &self.rules)
            .finish()
    }
}

#[async_trait]
impl<R: Send + Sync> Policy for CapabilityPolicy<R> {
    type Resource = R;

    fn resource_kind(&self) -> &str {
        &self.kind
    }

    async fn check(
        &self,
        resolver: &Resolver,
        user: &User,
        action: PolicyAction,
        _resource: Option<&R>,
    ) -> bool {
        self.requirement(action).is_met_by(resolver, user).await
    }
}

/// Policy governing ability administration.
pub type AbilityPolicy = CapabilityPolicy<Ability>;

/// Policy governing role administration.
pub type RolePolicy = CapabilityPolicy<Role>;

/// Ability administration: every action requires the manager role.
pub fn ability_policy(config: &RbacConfig) -> AbilityPolicy {
    CapabilityPolicy::new("ability", Requirement::Role(config.manager_role.clone()))
}

/// Role administration: every action requires the manager role.
pub fn role_policy(config: &RbacConfig) -> RolePolicy {
    CapabilityPolicy::new("role", Requirement::Role(config.manager_role.clone()))
}

/// A policy wrapped with the super-user before-hook.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rakshak_authz::{ability_policy, Gate, Membership, Resolver};
/// use rakshak_core::{RbacConfig, Role, User};
/// use rakshak_store::{MemoryStore, RbacStore};
///
/// # async fn example() -> rakshak_core::RbacResult<()> {
/// let config = RbacConfig::default();
/// let store: Arc<dyn RbacStore> = Arc::new(MemoryStore::new());
/// let membership = Membership::new(store.clone());
/// let gate = Gate::new(Resolver::new(store, &config), ability_policy(&config));
///
/// membership.create_role(Role::new("super")).await?;
/// let user = User::new("root");
/// assert!(!gate.index(&user).await);
///
/// membership.assign_role(&user, "super").await?;
/// assert!(gate.index(&user).await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gate<P> {
    resolver: Resolver,
    policy: P,
}

impl<P: Policy> Gate<P> {
    /// Wrap a policy.
    pub fn new(resolver: Resolver, policy: P) -> Self {
        Self { resolver, policy }
    }

    /// The wrapped policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Before-hook: `Some(true)` for super-users, `None` to fall through.
    pub async fn before(&self, user: &User) -> Option<bool> {
        if self.resolver.is_super_user(user).await {
            Some(true)
        } else {
            None
        }
    }

    /// Decide an action. Deny is a plain `false`.
    pub async fn allows(
        &self,
        user: &User,
        action: PolicyAction,
        resource: Option<&P::Resource>,
    ) -> bool {
        if let Some(decision) = self.before(user).await {
            debug!(
                user_id = %user.id,
                resource = self.policy.resource_kind(),
                action = %action,
                allowed = decision,
                "Gate decided by super-user bypass"
            );
            return decision;
        }

        let allowed = self
            .policy
            .check(&self.resolver, user, action, resource)
            .await;
        debug!(
            user_id = %user.id,
            resource = self.policy.resource_kind(),
            action = %action,
            allowed,
            "Gate decided by policy"
        );
        allowed
    }

    /// Like [`Gate::allows`] but turns a deny into `RbacError::Forbidden`.
    pub async fn authorize(
        &self,
        user: &User,
        action: PolicyAction,
        resource: Option<&P::Resource>,
    ) -> RbacResult<()> {
        if self.allows(user, action, resource).await {
            Ok(())
        } else {
            Err(RbacError::Forbidden)
        }
    }

    /// May the user list resources of this type?
    pub async fn index(&self, user: &User) -> bool {
        self.allows(user, PolicyAction::Index, None).await
    }

    /// May the user view this resource?
    pub async fn view(&self, user: &User, resource: &P::Resource) -> bool {
        self.allows(user, PolicyAction::View, Some(resource)).await
    }

    /// May the user create a resource of this type?
    pub async fn create(&self, user: &User) -> bool {
        self.allows(user, PolicyAction::Create, None).await
    }

    /// May the user update this resource?
    pub async fn update(&self, user: &User, resource: &P::Resource) -> bool {
        self.allows(user, PolicyAction::Update, Some(resource)).await
    }

    /// May the user delete this resource?
    pub async fn delete(&self, user: &User, resource: &P::Resource) -> bool {
        self.allows(user, PolicyAction::Delete, Some(resource)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Membership;
    use rakshak_store::{MemoryStore, RbacStore};
    use std::sync::Arc;

    struct Fixture {
        membership: Membership,
        resolver: Resolver,
        config: RbacConfig,
    }

    async fn fixture() -> Fixture {
        let config = RbacConfig::default();
        let store: Arc<dyn RbacStore> = Arc::new(MemoryStore::new());
        let membership = Membership::new(store.clone());
        membership.create_role(Role::new("super")).await.unwrap();
        membership.create_role(Role::new("rakshak")).await.unwrap();
        membership.create_role(Role::new("editor")).await.unwrap();
        Fixture {
            membership,
            resolver: Resolver::new(store, &config),
            config,
        }
    }

    /// Resource-specific rule that denies everything.
    struct DenyAll;

    #[async_trait]
    impl Policy for DenyAll {
        type Resource = ();

        fn resource_kind(&self) -> &str {
            "nothing"
        }

        async fn check(&self, _: &Resolver, _: &User, _: PolicyAction, _: Option<&()>) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_requirement_role() {
        let f = fixture().await;
        let user = User::new("alice");
        let req = Requirement::Role("editor".to_string());
        assert!(!req.is_met_by(&f.resolver, &user).await);

        f.membership.assign_role(&user, "editor").await.unwrap();
        assert!(req.is_met_by(&f.resolver, &user).await);
    }

    #[tokio::test]
    async fn test_requirement_any_role() {
        let f = fixture().await;
        let user = User::new("alice");
        let req = Requirement::AnyRole(vec!["ghost".to_string(), "editor".to_string()]);
        assert!(!req.is_met_by(&f.resolver, &user).await);

        f.membership.assign_role(&user, "editor").await.unwrap();
        assert!(req.is_met_by(&f.resolver, &user).await);
    }

    #[tokio::test]
    async fn test_requirement_ability() {
        let f = fixture().await;
        f.membership
            .create_ability(Ability::new("edit-post"))
            .await
            .unwrap();
        f.membership.add_ability("editor", "edit-post").await.unwrap();
        let user = User::new("alice");
        let req = Requirement::Ability("edit-post".to_string());
        assert!(!req.is_met_by(&f.resolver, &user).await);

        f.membership.assign_role(&user, "editor").await.unwrap();
        assert!(req.is_met_by(&f.resolver, &user).await);
    }

    #[tokio::test]
    async fn test_before_hook_overrides_policy() {
        let f = fixture().await;
        let gate = Gate::new(f.resolver.clone(), DenyAll);
        let user = User::new("root");
        assert_eq!(gate.before(&user).await, None);
        assert!(!gate.allows(&user, PolicyAction::Index, None).await);

        f.membership.assign_role(&user, "super").await.unwrap();
        assert_eq!(gate.before(&user).await, Some(true));
        for action in PolicyAction::all() {
            assert!(gate.allows(&user, action, Some(&())).await);
        }
    }

    #[tokio::test]
    async fn test_per_action_override() {
        let f = fixture().await;
        let policy = ability_policy(&f.config)
            .with_rule(PolicyAction::Index, Requirement::Role("editor".to_string()));
        let gate = Gate::new(f.resolver.clone(), policy);
        let user = User::new("alice");
        f.membership.assign_role(&user, "editor").await.unwrap();

        assert!(gate.index(&user).await);
        assert!(!gate.create(&user).await);
    }

    #[tokio::test]
    async fn test_authorize_maps_deny_to_forbidden() {
        let f = fixture().await;
        let gate = Gate::new(f.resolver.clone(), role_policy(&f.config));
        let user = User::new("alice");

        let err = gate
            .authorize(&user, PolicyAction::Create, None)
            .await
            .unwrap_err();
        assert_eq!(err, RbacError::Forbidden);

        f.membership.assign_role(&user, "rakshak").await.unwrap();
        assert!(gate.authorize(&user, PolicyAction::Create, None).await.is_ok());
    }

    #[test]
    fn test_builtin_policies_use_manager_role() {
        let config = RbacConfig {
            manager_role: "admin".to_string(),
            ..RbacConfig::default()
        };
        for action in PolicyAction::all() {
            assert_eq!(
                ability_policy(&config).requirement(action),
                &Requirement::Role("admin".to_string())
            );
            assert_eq!(
                role_policy(&config).requirement(action),
                &Requirement::Role("admin".to_string())
            );
        }
        assert_eq!(ability_policy(&config).resource_kind(), "ability");
        assert_eq!(role_policy(&config).resource_kind(), "role");
    }
}
