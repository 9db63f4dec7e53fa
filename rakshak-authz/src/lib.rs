//! # Rakshak Authorization
//!
//! Decides whether a user may perform an action, from the roles assigned to
//! the user and the abilities granted to those roles.
//!
//! ## Overview
//!
//! The rakshak-authz crate handles:
//! - **Membership**: Assign/retract roles, add/retract abilities, administer
//!   roles and abilities
//! - **Resolver**: `has_role`, `has_any_role`, `has_ability`, `is_super_user`
//! - **Policies**: Per-resource-type rules for `index`, `view`, `create`,
//!   `update` and `delete`
//! - **Gates**: Policies wrapped with the super-user before-hook
//!
//! ## Architecture
//!
//! ```text
//! caller ─→ Gate (before-hook: super-user ⇒ allow)
//!             └─→ Policy (action ⇒ Requirement)
//!                   └─→ Resolver (user ⇒ roles ⇒ abilities)
//!                         └─→ RbacStore
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rakshak_authz::{PolicyAction, Rakshak};
//! use rakshak_core::{Ability, RbacConfig, Role, User};
//! use rakshak_store::MemoryStore;
//!
//! async fn example() -> rakshak_core::RbacResult<()> {
//!     let rakshak = Rakshak::new(Arc::new(MemoryStore::new()), RbacConfig::default())?;
//!     let membership = rakshak.membership();
//!
//!     let editor = membership.create_role(Role::new("editor")).await?;
//!     let edit = membership.create_ability(Ability::new("edit-post")).await?;
//!     membership.add_ability(&editor, &edit).await?;
//!
//!     let user = User::new("alice");
//!     membership.assign_role(&user, "editor").await?;
//!
//!     assert!(rakshak.resolver().has_ability(&user, "edit-post").await);
//!
//!     // Denies surface as `RbacError::Forbidden` without detail
//!     rakshak
//!         .ability_gate()
//!         .authorize(&user, PolicyAction::Create, None)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! - Mutations referencing an unknown role or ability name fail with
//!   `RoleNotFound`/`AbilityNotFound`.
//! - Queries never fail: unknown names and store errors yield `false`.

pub mod actions;
pub mod membership;
pub mod policy;
pub mod resolver;
pub mod service;

// Re-export main types for convenience
pub use actions::PolicyAction;
pub use membership::Membership;
pub use policy::{
    ability_policy, role_policy, AbilityPolicy, CapabilityPolicy, Gate, Policy, Requirement,
    RolePolicy,
};
pub use resolver::Resolver;
pub use service::Rakshak;
