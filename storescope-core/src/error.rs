//! Error types for scope resolution

use crate::{EntityType, ScopeType};
use thiserror::Error;

/// Lookup and storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: u32 },

    #[error("Store code not found: {code:?}")]
    CodeNotFound { code: String },

    #[error("Default Website not found")]
    DefaultWebsiteNotFound,

    #[error("Default Store ID not found")]
    DefaultStoreNotFound,

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Structural invariant violations in the loaded hierarchy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entity_type:?} {id} references missing {target:?} {target_id}")]
    MissingReference {
        entity_type: EntityType,
        id: u32,
        target: EntityType,
        target_id: u32,
    },

    #[error("{entity_type:?} {id} references {target:?} {target_id} which belongs to {owner:?} {owner_id}, expected {expected_owner_id}")]
    ReferenceMismatch {
        entity_type: EntityType,
        id: u32,
        target: EntityType,
        target_id: u32,
        owner: EntityType,
        owner_id: u32,
        expected_owner_id: u32,
    },

    #[error("{entity_type:?} {id} has an empty code")]
    EmptyCode { entity_type: EntityType, id: u32 },

    #[error("{entity_type:?} code {code:?} is used by both {first_id} and {second_id}")]
    DuplicateCode {
        entity_type: EntityType,
        code: String,
        first_id: u32,
        second_id: u32,
    },

    #[error("Store {store_id} is not active")]
    InactiveStore { store_id: u32 },

    #[error("No default website found")]
    NoDefaultWebsite,

    #[error("Too many default websites: {ids:?}")]
    TooManyDefaultWebsites { ids: Vec<u32> },
}

/// Configuration and source decoding errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Parse error: {reason}")]
    Parse { reason: String },

    #[error("IO error on {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Master error type for all scope resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{operation} is not implemented for scope {scope:?}")]
    NotImplemented {
        operation: &'static str,
        scope: ScopeType,
    },
}

impl ScopeError {
    /// A key, code or required link has no matching entity.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScopeError::Storage(
                StorageError::NotFound { .. }
                    | StorageError::CodeNotFound { .. }
                    | StorageError::DefaultWebsiteNotFound
                    | StorageError::DefaultStoreNotFound
            )
        )
    }

    /// The data violates a structural invariant.
    pub fn is_not_valid(&self) -> bool {
        matches!(self, ScopeError::Validation(_))
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ScopeError::NotImplemented { .. })
    }
}

/// Result type alias for scope operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            entity_type: EntityType::Store,
            id: 42,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Entity not found"));
        assert!(msg.contains("Store"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn test_default_store_not_found_message() {
        let err = StorageError::DefaultStoreNotFound;
        assert_eq!(format!("{}", err), "Default Store ID not found");
    }

    #[test]
    fn test_validation_error_display_missing_reference() {
        let err = ValidationError::MissingReference {
            entity_type: EntityType::Group,
            id: 3,
            target: EntityType::Website,
            target_id: 9,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Group 3"));
        assert!(msg.contains("missing Website 9"));
    }

    #[test]
    fn test_validation_error_display_too_many_defaults() {
        let err = ValidationError::TooManyDefaultWebsites { ids: vec![1, 2] };
        let msg = format!("{}", err);
        assert!(msg.contains("Too many default websites"));
        assert!(msg.contains("[1, 2]"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "label".to_string(),
            value: "a b".to_string(),
            reason: "must not contain whitespace".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("label"));
        assert!(msg.contains("a b"));
        assert!(msg.contains("whitespace"));
    }

    #[test]
    fn test_scope_error_from_variants() {
        let storage = ScopeError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, ScopeError::Storage(_)));

        let validation = ScopeError::from(ValidationError::NoDefaultWebsite);
        assert!(matches!(validation, ScopeError::Validation(_)));

        let config = ScopeError::from(ConfigError::Parse {
            reason: "bad".to_string(),
        });
        assert!(matches!(config, ScopeError::Config(_)));
    }

    #[test]
    fn test_taxonomy_predicates() {
        let not_found = ScopeError::from(StorageError::CodeNotFound {
            code: "uk".to_string(),
        });
        assert!(not_found.is_not_found());
        assert!(!not_found.is_not_valid());

        let not_valid = ScopeError::from(ValidationError::InactiveStore { store_id: 1 });
        assert!(not_valid.is_not_valid());
        assert!(!not_valid.is_not_found());

        let not_impl = ScopeError::NotImplemented {
            operation: "allowed_stores",
            scope: ScopeType::Default,
        };
        assert!(not_impl.is_not_implemented());
        assert!(!not_impl.is_not_found());

        // Poisoned locks are neither missing data nor bad data
        let poisoned = ScopeError::from(StorageError::LockPoisoned);
        assert!(!poisoned.is_not_found());
        assert!(!poisoned.is_not_valid());
    }
}
