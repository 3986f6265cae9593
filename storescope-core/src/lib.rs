//! storescope Core - Entity Types
//!
//! Records, collections, scope selectors, the hierarchy validator and the
//! error taxonomy for the Website → Group → Store scope hierarchy. No
//! locking and no caching lives here; see `storescope-service`.

pub mod collection;
pub mod config;
pub mod entities;
pub mod error;
pub mod scope;
pub mod validate;

pub use collection::{Collection, GroupCollection, StoreCollection, WebsiteCollection};
pub use config::ServiceConfig;
pub use entities::{
    Entity, EntityType, Group, GroupId, Store, StoreId, Website, WebsiteId, ADMIN_STORE_ID,
};
pub use error::{ConfigError, ScopeError, ScopeResult, StorageError, ValidationError};
pub use scope::{ScopeType, TypeId};
pub use validate::{validate_default_website, validate_hierarchy};
