//! # Rakshak Store
//!
//! Persistence interface for the Rakshak access control core.
//!
//! ## Overview
//!
//! The rakshak-store crate handles:
//! - **Repository trait**: [`RbacStore`], the narrow interface the
//!   authorization core consumes (lookups by id or name, membership edges,
//!   uniqueness on names)
//! - **In-memory backend**: [`MemoryStore`] for tests and single-process apps
//!
//! ## Consistency
//!
//! Every mutation is atomic. A concurrent `has_role` check observes either
//! the state before an `attach_role` or the state after it.
//!
//! Deleting a role or ability cascades: its membership and grant edges are
//! removed in the same mutation, so no edge ever points at a missing entity.
//!
//! ## Features
//!
//! - `memory` (default): In-memory store

pub mod repository;

#[cfg(feature = "memory")]
pub mod memory;

// Re-export main types
pub use repository::{RbacStore, Removed, StoreStats};

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
