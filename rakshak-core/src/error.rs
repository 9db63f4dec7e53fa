//! Error types for access control operations
//!
//! This module defines the errors raised by membership mutations, entity
//! administration and gate authorization. Boolean queries (`has_role`,
//! `has_ability`, ...) never produce these errors: a missing grant is a
//! plain `false`.

use thiserror::Error;

/// Access control error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RbacError {
    /// No role matches the given id or name
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// No ability matches the given id or name
    #[error("Ability not found: {0}")]
    AbilityNotFound(String),

    /// A role with this name already exists
    #[error("Role already exists: {0}")]
    DuplicateRole(String),

    /// An ability with this name already exists
    #[error("Ability already exists: {0}")]
    DuplicateAbility(String),

    /// Role or ability name is empty or otherwise unusable
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// The acting user is not allowed to perform the action.
    ///
    /// Deliberately carries no detail about the missing grant.
    #[error("Forbidden")]
    Forbidden,

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for access control operations.
pub type RbacResult<T> = Result<T, RbacError>;

impl RbacError {
    /// Check if this error reports a missing role or ability.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RbacError::RoleNotFound(_) | RbacError::AbilityNotFound(_))
    }

    /// Check if this error should be logged at error level.
    ///
    /// Not-found, duplicate and forbidden outcomes are caller mistakes or
    /// ordinary denials, not server faults.
    pub fn is_server_error(&self) -> bool {
        matches!(self, RbacError::Storage(_) | RbacError::Config(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RbacError::RoleNotFound(_) | RbacError::AbilityNotFound(_) => 404,
            RbacError::DuplicateRole(_) | RbacError::DuplicateAbility(_) => 409,
            RbacError::InvalidName(_) => 422,
            RbacError::Forbidden => 403,
            RbacError::Storage(_) | RbacError::Config(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            RbacError::AbilityNotFound(_) => "ABILITY_NOT_FOUND",
            RbacError::DuplicateRole(_) => "DUPLICATE_ROLE",
            RbacError::DuplicateAbility(_) => "DUPLICATE_ABILITY",
            RbacError::InvalidName(_) => "INVALID_NAME",
            RbacError::Forbidden => "FORBIDDEN",
            RbacError::Storage(_) => "STORAGE_ERROR",
            RbacError::Config(_) => "CONFIG_ERROR",
        }
    }
}
