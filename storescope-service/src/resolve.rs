//! Scope resolution algorithms.
//!
//! Every algorithm reads through the service's cache-backed accessors and
//! scans the authoritative collections in their sorted order, so the first
//! match is always the lowest `sort_order`, then the lowest id.

use std::sync::Arc;

use storescope_core::{
    ScopeError, ScopeResult, ScopeType, StorageError, Store, StoreCollection, StoreId, TypeId,
    ValidationError, WebsiteId,
};
use tracing::debug;

use crate::Service;

impl Service {
    /// The store reached by following the default website to its default
    /// group and on to that group's default store.
    ///
    /// Broken links and an inactive store both surface as
    /// [`StorageError::DefaultStoreNotFound`]. The resolved id is memoized
    /// until the next reload or cache invalidation.
    pub fn default_store_view(&self) -> ScopeResult<Arc<Store>> {
        let generation = {
            let state = self.read()?;
            if let Some(store) = state
                .default_store_id
                .and_then(|id| state.cached_store(id))
            {
                self.record_hit();
                return Ok(Arc::clone(store));
            }
            state.generation
        };

        let store = self.follow_default_links().map_err(|e| match e {
            ScopeError::Storage(StorageError::LockPoisoned) => e,
            _ => ScopeError::Storage(StorageError::DefaultStoreNotFound),
        })?;

        let mut state = self.write()?;
        if state.generation == generation {
            state.remember_default_store(&store);
            debug!(
                hierarchy = %self.label(),
                store_id = store.store_id,
                "default store memoized"
            );
        }
        Ok(store)
    }

    fn follow_default_links(&self) -> ScopeResult<Arc<Store>> {
        let website = self.default_website()?;
        let group = self.group(website.default_group_id)?;
        let store = self.store(group.default_store_id)?;
        if !store.is_active {
            return Err(ValidationError::InactiveStore {
                store_id: store.store_id,
            }
            .into());
        }
        Ok(store)
    }

    /// Store id and website id of `store_id`, which must be active.
    fn active_store(&self, store_id: StoreId) -> ScopeResult<(StoreId, WebsiteId)> {
        let store = self.store(store_id)?;
        if !store.is_active {
            return Err(ValidationError::InactiveStore { store_id }.into());
        }
        Ok((store.store_id, store.website_id))
    }

    fn website_default_store(&self, website_id: WebsiteId) -> ScopeResult<(StoreId, WebsiteId)> {
        let website = self.website(website_id)?;
        let group = self.group(website.default_group_id)?;
        self.active_store(group.default_store_id)
    }

    /// Default store of the scope named by `scope`.
    ///
    /// Store scope returns the store itself, Group its default store,
    /// Website its default group's default store. Absent and Default use the
    /// default website. An inactive result is [`ValidationError::InactiveStore`].
    pub fn default_store_id(&self, scope: TypeId) -> ScopeResult<(StoreId, WebsiteId)> {
        match scope.unpack() {
            (ScopeType::Store, id) => self.active_store(id),
            (ScopeType::Group, id) => {
                let group = self.group(id)?;
                self.active_store(group.default_store_id)
            }
            (ScopeType::Website, id) => self.website_default_store(id),
            (ScopeType::Absent | ScopeType::Default, _) => {
                let website = self.default_website()?;
                self.website_default_store(website.website_id)
            }
        }
    }

    /// First active store coded `code` inside `scope`.
    ///
    /// An empty code falls back to the default store. Absent and Default
    /// search every store of the default website.
    pub fn store_id_by_code(&self, scope: TypeId, code: &str) -> ScopeResult<(StoreId, WebsiteId)> {
        if code.is_empty() {
            return self.default_store_id(TypeId::absent());
        }

        let (scope_type, id) = scope.unpack();
        let website_id = match scope_type {
            ScopeType::Absent | ScopeType::Default => Some(self.default_website()?.website_id),
            ScopeType::Website => Some(id),
            ScopeType::Group | ScopeType::Store => None,
        };

        let stores = self.stores()?;
        stores
            .iter()
            .find(|s| {
                s.is_active
                    && s.code == code
                    && (scope_type != ScopeType::Group || s.group_id == id)
                    && website_id.map_or(true, |w| s.website_id == w)
            })
            .map(|s| (s.store_id, s.website_id))
            .ok_or_else(|| {
                debug!(hierarchy = %self.label(), %scope, code, "store code not in scope");
                StorageError::CodeNotFound {
                    code: code.to_string(),
                }
                .into()
            })
    }

    /// Whether `store_id` may be served under `run_mode`, with its code.
    ///
    /// Store scope only checks the store's own active flag and ignores the
    /// run mode's id. Group and Website scope require the store to be
    /// active and inside that group or website.
    pub fn is_allowed_store_id(
        &self,
        run_mode: TypeId,
        store_id: StoreId,
    ) -> ScopeResult<(bool, String)> {
        match run_mode.unpack() {
            (ScopeType::Store, _) => {
                let store = self.store(store_id)?;
                let code = if store.is_active {
                    store.code.clone()
                } else {
                    String::new()
                };
                Ok((store.is_active, code))
            }
            (scope @ (ScopeType::Group | ScopeType::Website), id) => {
                let stores = self.stores()?;
                let allowed = stores.iter().find(|s| {
                    s.store_id == store_id && s.is_active && in_scope(s, scope, id)
                });
                Ok(match allowed {
                    Some(s) => (true, s.code.clone()),
                    None => (false, String::new()),
                })
            }
            (scope, _) => Err(ScopeError::NotImplemented {
                operation: "is_allowed_store_id",
                scope,
            }),
        }
    }

    /// Active stores visible under `run_mode`, as a fresh collection.
    pub fn allowed_stores(&self, run_mode: TypeId) -> ScopeResult<StoreCollection> {
        let (scope, id) = run_mode.unpack();
        if matches!(scope, ScopeType::Absent | ScopeType::Default) {
            return Err(ScopeError::NotImplemented {
                operation: "allowed_stores",
                scope,
            });
        }
        Ok(self
            .stores()?
            .filter(|s| s.is_active && in_scope(s, scope, id)))
    }
}

fn in_scope(store: &Store, scope: ScopeType, id: u32) -> bool {
    match scope {
        ScopeType::Group => store.group_id == id,
        ScopeType::Website => store.website_id == id,
        ScopeType::Store => true,
        ScopeType::Absent | ScopeType::Default => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
