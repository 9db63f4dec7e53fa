//! Access control entry point
//!
//! Bundles a store and a configuration into the membership service, the
//! resolver and the built-in role and ability gates, so hosts construct
//! everything from one place.

use std::sync::Arc;

use rakshak_core::{RbacConfig, RbacResult, Role};
use rakshak_store::RbacStore;
use tracing::info;

use crate::membership::Membership;
use crate::policy::{ability_policy, role_policy, AbilityPolicy, Gate, Policy, RolePolicy};
use crate::resolver::Resolver;

/// Access control service for a host application.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rakshak_authz::Rakshak;
/// use rakshak_core::{RbacConfig, User};
/// use rakshak_store::MemoryStore;
///
/// # async fn example() -> rakshak_core::RbacResult<()> {
/// let rakshak = Rakshak::new(Arc::new(MemoryStore::new()), RbacConfig::default())?;
/// rakshak.install().await?;
///
/// let user = User::new("alice");
/// rakshak.membership().assign_role(&user, "rakshak").await?;
/// assert!(rakshak.ability_gate().index(&user).await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Rakshak {
    config: RbacConfig,
    membership: Membership,
    resolver: Resolver,
    ability_gate: Gate<AbilityPolicy>,
    role_gate: Gate<RolePolicy>,
}

impl Rakshak {
    /// Build the service. Fails if the configuration is invalid.
    pub fn new(store: Arc<dyn RbacStore>, config: RbacConfig) -> RbacResult<Self> {
        config.validate()?;

        let resolver = Resolver::new(store.clone(), &config);
        Ok(Self {
            membership: Membership::new(store),
            ability_gate: Gate::new(resolver.clone(), ability_policy(&config)),
            role_gate: Gate::new(resolver.clone(), role_policy(&config)),
            resolver,
            config,
        })
    }

    /// Build the service with configuration taken from the environment.
    pub fn from_env(store: Arc<dyn RbacStore>) -> RbacResult<Self> {
        Self::new(store, RbacConfig::from_env())
    }

    /// Create the configured super and manager roles if they are missing.
    ///
    /// Safe to run on every start. Returns the two roles as stored.
    pub async fn install(&self) -> RbacResult<Vec<Role>> {
        let builtins = [
            Role::new(self.config.super_role.as_str())
                .with_label("Super User")
                .with_description("Allowed every action on every resource"),
            Role::new(self.config.manager_role.as_str())
                .with_label("Access Manager")
                .with_description("Administers roles and abilities"),
        ];

        let mut roles = Vec::with_capacity(builtins.len());
        for role in builtins {
            roles.push(self.membership.ensure_role(role).await?);
        }

        info!(
            super_role = %self.config.super_role,
            manager_role = %self.config.manager_role,
            "Built-in roles installed"
        );
        Ok(roles)
    }

    /// Active configuration.
    pub fn config(&self) -> &RbacConfig {
        &self.config
    }

    /// Membership and administration operations.
    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Role and ability queries.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Gate for ability administration.
    pub fn ability_gate(&self) -> &Gate<AbilityPolicy> {
        &self.ability_gate
    }

    /// Gate for role administration.
    pub fn role_gate(&self) -> &Gate<RolePolicy> {
        &self.role_gate
    }

    /// Wrap a host-defined policy with the super-user before-hook.
    pub fn gate<P: Policy>(&self, policy: P) -> Gate<P> {
        Gate::new(self.resolver.clone(), policy)
    }
}
