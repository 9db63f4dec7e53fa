//! # Policy Actions
//!
//! The CRUD-style actions a policy gate decides on.

use serde::{Deserialize, Serialize};

/// Actions a policy gate can authorize on a protected resource type.
///
/// - **Index**: List resources of the type
/// - **View**: Show a single resource
/// - **Create**: Create a new resource
/// - **Update**: Modify an existing resource
/// - **Delete**: Remove an existing resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    /// List resources.
    Index,

    /// View a single resource.
    View,

    /// Create a resource.
    Create,

    /// Update a resource.
    Update,

    /// Delete a resource.
    Delete,
}

impl PolicyAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyAction::Index => "index",
            PolicyAction::View => "view",
            PolicyAction::Create => "create",
            PolicyAction::Update => "update",
            PolicyAction::Delete => "delete",
        }
    }

    /// Parse action from string representation.
    ///
    /// Case-insensitive, accepts the usual controller-method aliases.
    ///
    /// # Example
    ///
    /// ```
    /// use rakshak_authz::PolicyAction;
    ///
    /// assert_eq!(PolicyAction::parse("index"), Some(PolicyAction::Index));
    /// assert_eq!(PolicyAction::parse("show"), Some(PolicyAction::View));
    /// assert_eq!(PolicyAction::parse("Destroy"), Some(PolicyAction::Delete));
    /// assert_eq!(PolicyAction::parse("publish"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "index" | "list" | "browse" => Some(PolicyAction::Index),
            "view" | "show" | "read" => Some(PolicyAction::View),
            "create" | "store" | "new" => Some(PolicyAction::Create),
            "update" | "edit" | "patch" | "put" => Some(PolicyAction::Update),
            "delete" | "destroy" | "remove" => Some(PolicyAction::Delete),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> [Self; 5] {
        [
            PolicyAction::Index,
            PolicyAction::View,
            PolicyAction::Create,
            PolicyAction::Update,
            PolicyAction::Delete,
        ]
    }

    /// Whether the action targets an existing resource instance.
    pub fn requires_resource(&self) -> bool {
        matches!(
            self,
            PolicyAction::View | PolicyAction::Update | PolicyAction::Delete
        )
    }

    /// Whether the action leaves resources unchanged.
    pub fn is_read_only(&self) -> bool {
        matches!(self, PolicyAction::Index | PolicyAction::View)
    }
}

impl std::fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(PolicyAction::parse("index"), Some(PolicyAction::Index));
        assert_eq!(PolicyAction::parse("list"), Some(PolicyAction::Index));

        assert_eq!(PolicyAction::parse("view"), Some(PolicyAction::View));
        assert_eq!(PolicyAction::parse("SHOW"), Some(PolicyAction::View));

        assert_eq!(PolicyAction::parse("store"), Some(PolicyAction::Create));
        assert_eq!(PolicyAction::parse("edit"), Some(PolicyAction::Update));
        assert_eq!(PolicyAction::parse("destroy"), Some(PolicyAction::Delete));

        assert_eq!(PolicyAction::parse("approve"), None);
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for action in PolicyAction::all() {
            assert_eq!(PolicyAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_requires_resource() {
        assert!(!PolicyAction::Index.requires_resource());
        assert!(!PolicyAction::Create.requires_resource());
        assert!(PolicyAction::View.requires_resource());
        assert!(PolicyAction::Update.requires_resource());
        assert!(PolicyAction::Delete.requires_resource());
    }

    #[test]
    fn test_is_read_only() {
        assert!(PolicyAction::Index.is_read_only());
        assert!(PolicyAction::View.is_read_only());
        assert!(!PolicyAction::Create.is_read_only());
        assert!(!PolicyAction::Delete.is_read_only());
    }
}
