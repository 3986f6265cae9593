//! storescope Service - Scope Resolution and Caching
//!
//! Holds one validated Website → Group → Store hierarchy in memory behind a
//! single `RwLock`, serves cache-backed lookups and answers the scope
//! questions request routing asks: the default store of a scope, a store by
//! code within a scope, and which stores a scope may serve.
//!
//! Every log event carries `hierarchy = <label>` from [`ServiceConfig`], so
//! several services can share one process and one subscriber.

mod options;
mod resolve;
mod service;
mod source;

pub use options::{with_groups, with_source, with_stores, with_websites, ScopeOption};
pub use service::{CacheStats, Hierarchy, Service};
pub use source::{HierarchySource, StaticSource, YamlSource};

pub use storescope_core::{
    Collection, ConfigError, Entity, EntityType, Group, GroupCollection, GroupId, ScopeError,
    ScopeResult, ScopeType, ServiceConfig, StorageError, Store, StoreCollection, StoreId, TypeId,
    ValidationError, Website, WebsiteCollection, WebsiteId, ADMIN_STORE_ID,
};
