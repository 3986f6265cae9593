//! The scope resolution service.
//!
//! A [`Service`] owns the three authoritative collections, one lookup cache
//! per entity kind and the memoized default store id, all behind a single
//! `RwLock`. Collections are held as `Arc` snapshots: readers get a cheap
//! clone of the `Arc`, and every structural mutation swaps in new `Arc`s
//! instead of touching the old ones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use storescope_core::{
    Collection, Entity, Group, GroupCollection, GroupId, ScopeError, ScopeResult,
    ServiceConfig, Store, StoreCollection, StoreId, StorageError, Website, WebsiteCollection,
    WebsiteId,
};
use tracing::{debug, info, warn};

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Default)]
pub(crate) struct ServiceState {
    /// Bumped whenever the authoritative collections are replaced.
    pub(crate) generation: u64,
    pub(crate) websites: Arc<WebsiteCollection>,
    pub(crate) groups: Arc<GroupCollection>,
    pub(crate) stores: Arc<StoreCollection>,
    website_cache: HashMap<WebsiteId, Arc<Website>>,
    group_cache: HashMap<GroupId, Arc<Group>>,
    store_cache: HashMap<StoreId, Arc<Store>>,
    pub(crate) default_store_id: Option<StoreId>,
}

impl ServiceState {
    pub(crate) fn clear_caches(&mut self) {
        self.website_cache.clear();
        self.group_cache.clear();
        self.store_cache.clear();
        self.default_store_id = None;
    }

    fn caches_empty(&self) -> bool {
        self.website_cache.is_empty()
            && self.group_cache.is_empty()
            && self.store_cache.is_empty()
            && self.default_store_id.is_none()
    }

    fn cache_len(&self) -> usize {
        self.website_cache.len() + self.group_cache.len() + self.store_cache.len()
    }

    pub(crate) fn cached_store(&self, id: StoreId) -> Option<&Arc<Store>> {
        self.store_cache.get(&id)
    }

    /// Memoize the default store and keep it in the store cache so the
    /// memo is served without a scan.
    pub(crate) fn remember_default_store(&mut self, store: &Arc<Store>) {
        self.store_cache
            .entry(store.store_id)
            .or_insert_with(|| Arc::clone(store));
        self.default_store_id = Some(store.store_id);
    }
}

/// Ties an entity kind to its collection and cache inside [`ServiceState`].
pub(crate) trait Cached: Entity {
    fn collection(state: &ServiceState) -> &Arc<Collection<Self>>;
    fn cache(state: &ServiceState) -> &HashMap<u32, Arc<Self>>;
    fn cache_mut(state: &mut ServiceState) -> &mut HashMap<u32, Arc<Self>>;
}

impl Cached for Website {
    fn collection(state: &ServiceState) -> &Arc<Collection<Self>> {
        &state.websites
    }

    fn cache(state: &ServiceState) -> &HashMap<u32, Arc<Self>> {
        &state.website_cache
    }

    fn cache_mut(state: &mut ServiceState) -> &mut HashMap<u32, Arc<Self>> {
        &mut state.website_cache
    }
}

impl Cached for Group {
    fn collection(state: &ServiceState) -> &Arc<Collection<Self>> {
        &state.groups
    }

    fn cache(state: &ServiceState) -> &HashMap<u32, Arc<Self>> {
        &state.group_cache
    }

    fn cache_mut(state: &mut ServiceState) -> &mut HashMap<u32, Arc<Self>> {
        &mut state.group_cache
    }
}

impl Cached for Store {
    fn collection(state: &ServiceState) -> &Arc<Collection<Self>> {
        &state.stores
    }

    fn cache(state: &ServiceState) -> &HashMap<u32, Arc<Self>> {
        &state.store_cache
    }

    fn cache_mut(state: &mut ServiceState) -> &mut HashMap<u32, Arc<Self>> {
        &mut state.store_cache
    }
}

// ============================================================================
// SNAPSHOTS & STATISTICS
// ============================================================================

/// A consistent view of all three collections taken under one read lock.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    pub websites: Arc<WebsiteCollection>,
    pub groups: Arc<GroupCollection>,
    pub stores: Arc<StoreCollection>,
}

/// Statistics about lookup cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries currently in the three caches.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

/// Scope resolver over one Website → Group → Store hierarchy.
///
/// `Service` is `Send + Sync`; share it with `Arc<Service>`.
///
/// # Example
///
/// ```rust,ignore
/// use storescope_service::{with_groups, with_stores, with_websites, Service};
///
/// let service = Service::default();
/// service.options([
///     with_websites([Website::new(1, "euro", 1).with_default(true)]),
///     with_groups([Group::new(1, 1, 1)]),
///     with_stores([Store::new(1, "de", 1, 1).with_active(true)]),
/// ])?;
/// assert_eq!(service.default_store_view()?.code, "de");
/// ```
#[derive(Debug)]
pub struct Service {
    config: ServiceConfig,
    state: RwLock<ServiceState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for Service {
    fn default() -> Self {
        Self::from_valid_config(ServiceConfig::default())
    }
}

impl Service {
    /// Create an empty service.
    pub fn new(config: ServiceConfig) -> ScopeResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ServiceConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ServiceState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Label attached to this service's log events.
    pub fn label(&self) -> &str {
        &self.config.label
    }

    // === Locking ===

    pub(crate) fn read(&self) -> ScopeResult<RwLockReadGuard<'_, ServiceState>> {
        self.state
            .read()
            .map_err(|_| ScopeError::Storage(StorageError::LockPoisoned))
    }

    pub(crate) fn write(&self) -> ScopeResult<RwLockWriteGuard<'_, ServiceState>> {
        self.state
            .write()
            .map_err(|_| ScopeError::Storage(StorageError::LockPoisoned))
    }

    /// Write access for maintenance operations that must always succeed.
    /// A poisoned lock is recovered; the state is about to be overwritten.
    fn write_recover(&self) -> RwLockWriteGuard<'_, ServiceState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!(hierarchy = %self.config.label, "state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // === Entity lookups ===

    /// Cache-backed lookup by primary key.
    ///
    /// A miss scans the authoritative collection under the read lock, then
    /// takes the write lock to fill the cache slot. The fill is skipped when
    /// the collections were replaced in between, so a racing reload never
    /// leaves an entity from the old data set in the cache.
    fn lookup<T: Cached>(&self, id: u32) -> ScopeResult<Arc<T>> {
        let (found, generation) = {
            let state = self.read()?;
            if let Some(hit) = T::cache(&state).get(&id) {
                self.record_hit();
                return Ok(Arc::clone(hit));
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
            let found = T::collection(&state).by_id(id).cloned().ok_or(
                StorageError::NotFound {
                    entity_type: T::entity_type(),
                    id,
                },
            )?;
            (found, state.generation)
        };

        debug!(
            hierarchy = %self.config.label,
            entity_type = ?T::entity_type(),
            id,
            "cache miss"
        );

        let mut state = self.write()?;
        if state.generation != generation {
            return Ok(found);
        }
        let cached = T::cache_mut(&mut state)
            .entry(id)
            .or_insert_with(|| Arc::clone(&found));
        Ok(Arc::clone(cached))
    }

    pub fn website(&self, id: WebsiteId) -> ScopeResult<Arc<Website>> {
        self.lookup(id)
    }

    pub fn group(&self, id: GroupId) -> ScopeResult<Arc<Group>> {
        self.lookup(id)
    }

    pub fn store(&self, id: StoreId) -> ScopeResult<Arc<Store>> {
        self.lookup(id)
    }

    // === Collection accessors ===

    /// All websites in natural order. The snapshot never changes; a reload
    /// replaces the service's collection rather than mutating this one.
    pub fn websites(&self) -> ScopeResult<Arc<WebsiteCollection>> {
        Ok(Arc::clone(&self.read()?.websites))
    }

    pub fn groups(&self) -> ScopeResult<Arc<GroupCollection>> {
        Ok(Arc::clone(&self.read()?.groups))
    }

    pub fn stores(&self) -> ScopeResult<Arc<StoreCollection>> {
        Ok(Arc::clone(&self.read()?.stores))
    }

    /// All three collections from the same generation.
    pub fn hierarchy(&self) -> ScopeResult<Hierarchy> {
        let state = self.read()?;
        Ok(Hierarchy {
            websites: Arc::clone(&state.websites),
            groups: Arc::clone(&state.groups),
            stores: Arc::clone(&state.stores),
        })
    }

    // === Hierarchy navigation ===

    /// The single website flagged `is_default`.
    pub fn default_website(&self) -> ScopeResult<Arc<Website>> {
        let websites = self.websites()?;
        let website_id = websites
            .iter()
            .find(|w| w.is_default)
            .map(|w| w.website_id)
            .ok_or(StorageError::DefaultWebsiteNotFound)?;
        self.website(website_id)
    }

    pub fn website_groups(&self, website_id: WebsiteId) -> ScopeResult<GroupCollection> {
        self.website(website_id)?;
        Ok(self.groups()?.filter(|g| g.website_id == website_id))
    }

    pub fn website_stores(&self, website_id: WebsiteId) -> ScopeResult<StoreCollection> {
        self.website(website_id)?;
        Ok(self.stores()?.filter(|s| s.website_id == website_id))
    }

    pub fn group_stores(&self, group_id: GroupId) -> ScopeResult<StoreCollection> {
        self.group(group_id)?;
        Ok(self.stores()?.filter(|s| s.group_id == group_id))
    }

    pub fn store_by_code(&self, code: &str) -> ScopeResult<Arc<Store>> {
        let stores = self.stores()?;
        let store_id = stores
            .by_code(code)
            .map(|s| s.store_id)
            .ok_or_else(|| StorageError::CodeNotFound {
                code: code.to_string(),
            })?;
        self.store(store_id)
    }

    /// Exactly one active store besides the admin store.
    pub fn has_single_store(&self) -> ScopeResult<bool> {
        let stores = self.stores()?;
        Ok(stores.iter().filter(|s| s.is_active && !s.is_admin()).count() == 1)
    }

    /// Single store mode is enabled in the config and the data allows it.
    pub fn is_single_store_mode(&self) -> ScopeResult<bool> {
        Ok(self.config.single_store_mode && self.has_single_store()?)
    }

    // === Cache maintenance ===

    /// Drop all three caches and the default store memo. Data is kept.
    pub fn invalidate_cache(&self) {
        let mut state = self.write_recover();
        state.clear_caches();
        debug!(hierarchy = %self.config.label, "caches invalidated");
    }

    /// Drop caches, the default store memo and all loaded data.
    pub fn reset(&self) {
        let mut state = self.write_recover();
        let generation = state.generation + 1;
        *state = ServiceState {
            generation,
            ..ServiceState::default()
        };
        info!(hierarchy = %self.config.label, generation, "hierarchy reset");
    }

    /// True iff all caches are empty and no default store id is memoized.
    pub fn is_cache_empty(&self) -> bool {
        match self.state.read() {
            Ok(state) => state.caches_empty(),
            Err(poisoned) => poisoned.into_inner().caches_empty(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        let entry_count = match self.state.read() {
            Ok(state) => state.cache_len(),
            Err(poisoned) => poisoned.into_inner().cache_len(),
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: entry_count as u64,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
