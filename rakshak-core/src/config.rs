//! Access control configuration.
//!
//! Holds the conventional role names the resolver and the built-in policies
//! rely on. Configuration is loaded from environment variables with the
//! package defaults as fallback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RbacError;

/// Default name of the super-user role.
pub const DEFAULT_SUPER_ROLE: &str = "super";

/// Default name of the role allowed to administer roles and abilities.
pub const DEFAULT_MANAGER_ROLE: &str = "rakshak";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

impl From<ConfigError> for RbacError {
    fn from(err: ConfigError) -> Self {
        RbacError::Config(err.to_string())
    }
}

/// Role names the access control core treats specially.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RbacConfig {
    /// Holders of this role pass every gate check.
    pub super_role: String,

    /// Role required by the built-in role and ability policies.
    pub manager_role: String,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            super_role: DEFAULT_SUPER_ROLE.to_string(),
            manager_role: DEFAULT_MANAGER_ROLE.to_string(),
        }
    }
}

impl RbacConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RAKSHAK_SUPER_ROLE`: super-user role name (default: super)
    /// - `RAKSHAK_MANAGER_ROLE`: administrator role name (default: rakshak)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or blank values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let read = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            super_role: read("RAKSHAK_SUPER_ROLE", default.super_role),
            manager_role: read("RAKSHAK_MANAGER_ROLE", default.manager_role),
        }
    }

    /// Check that both role names are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.super_role.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "super_role".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.manager_role.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "manager_role".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
