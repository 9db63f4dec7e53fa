//! # Rakshak Core
//!
//! Domain model for the Rakshak role-based access control core.
//!
//! ## Overview
//!
//! The rakshak-core crate handles:
//! - **Abilities**: Named atomic permissions (e.g. `edit-post`)
//! - **Roles**: Named bundles of abilities
//! - **Users**: Authenticated principals holding roles
//! - **Join records**: `UserRole` and `RoleAbility` edges
//! - **References**: Name-or-id arguments resolved at the API boundary
//! - **Errors** and **Configuration** shared by the other rakshak crates
//!
//! ## Architecture
//!
//! ```text
//! User ──< UserRole >── Role ──< RoleAbility >── Ability
//!
//! can(user, ability) = user is super
//!                    || any role of user grants ability
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rakshak_core::{Role, RoleRef};
//!
//! let role = Role::new("site_manager");
//!
//! // Either form designates the same role
//! assert!(RoleRef::from(&role).matches(&role));
//! assert!(RoleRef::from("site_manager").matches(&role));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod ability;
pub mod config;
pub mod error;
pub mod membership;
pub mod reference;
pub mod role;

// Re-export main types for convenience
pub use ability::Ability;
pub use config::{ConfigError, RbacConfig};
pub use error::{RbacError, RbacResult};
pub use membership::{RoleAbility, User, UserRole};
pub use reference::{AbilityRef, RoleRef};
pub use role::Role;
