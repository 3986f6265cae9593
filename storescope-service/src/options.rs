//! Options that load or upsert hierarchy records.
//!
//! [`Service::options`] is all-or-nothing: sources are queried first,
//! then candidate collections are built from copies of the current ones,
//! upserted, sorted and validated. Only a fully valid candidate replaces the
//! service's data; any error leaves the service untouched.

use std::fmt;
use std::sync::Arc;

use storescope_core::{
    validate_hierarchy, Collection, Entity, Group, ScopeResult, ServiceConfig, Store, Website,
};
use tracing::{info, warn};

use crate::source::HierarchySource;
use crate::Service;

/// Priority of source loaders. Lower runs first.
const PRIORITY_SOURCE: u8 = 0;
const PRIORITY_WEBSITES: u8 = 10;
const PRIORITY_GROUPS: u8 = 20;
const PRIORITY_STORES: u8 = 30;

/// A single mutation applied by [`Service::options`].
pub enum ScopeOption {
    Websites(Vec<Website>),
    Groups(Vec<Group>),
    Stores(Vec<Store>),
    Source(Arc<dyn HierarchySource>),
}

impl ScopeOption {
    /// Options are applied in ascending priority: sources, then websites,
    /// groups, stores. Ties keep the caller's order.
    pub fn priority(&self) -> u8 {
        match self {
            ScopeOption::Source(_) => PRIORITY_SOURCE,
            ScopeOption::Websites(_) => PRIORITY_WEBSITES,
            ScopeOption::Groups(_) => PRIORITY_GROUPS,
            ScopeOption::Stores(_) => PRIORITY_STORES,
        }
    }
}

impl fmt::Debug for ScopeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeOption::Websites(w) => f.debug_tuple("Websites").field(&w.len()).finish(),
            ScopeOption::Groups(g) => f.debug_tuple("Groups").field(&g.len()).finish(),
            ScopeOption::Stores(s) => f.debug_tuple("Stores").field(&s.len()).finish(),
            ScopeOption::Source(_) => f.write_str("Source(..)"),
        }
    }
}

pub fn with_websites<I: IntoIterator<Item = Website>>(websites: I) -> ScopeOption {
    ScopeOption::Websites(websites.into_iter().collect())
}

pub fn with_groups<I: IntoIterator<Item = Group>>(groups: I) -> ScopeOption {
    ScopeOption::Groups(groups.into_iter().collect())
}

pub fn with_stores<I: IntoIterator<Item = Store>>(stores: I) -> ScopeOption {
    ScopeOption::Stores(stores.into_iter().collect())
}

/// Load websites, groups and stores from a [`HierarchySource`].
pub fn with_source<S: HierarchySource + 'static>(source: S) -> ScopeOption {
    ScopeOption::Source(Arc::new(source))
}

/// Records ready to be upserted, after sources have been queried.
enum Batch {
    Websites(Vec<Website>),
    Groups(Vec<Group>),
    Stores(Vec<Store>),
}

fn into_batches(mut options: Vec<ScopeOption>) -> ScopeResult<Vec<Batch>> {
    options.sort_by_key(ScopeOption::priority);

    let mut batches = Vec::with_capacity(options.len());
    for option in options {
        match option {
            ScopeOption::Websites(w) => batches.push(Batch::Websites(w)),
            ScopeOption::Groups(g) => batches.push(Batch::Groups(g)),
            ScopeOption::Stores(s) => batches.push(Batch::Stores(s)),
            ScopeOption::Source(source) => {
                let data = source.select_all()?;
                batches.push(Batch::Websites(data.websites));
                batches.push(Batch::Groups(data.groups));
                batches.push(Batch::Stores(data.stores));
            }
        }
    }
    Ok(batches)
}

/// Upsert one batch into a candidate and run that kind's own validator.
fn apply<T: Entity>(candidate: &mut Collection<T>, records: Vec<T>) -> ScopeResult<()> {
    candidate.upsert(records);
    candidate.validate()
}

impl Service {
    /// Create a service and apply `options` to it.
    pub fn with_options<I>(config: ServiceConfig, options: I) -> ScopeResult<Self>
    where
        I: IntoIterator<Item = ScopeOption>,
    {
        let service = Self::new(config)?;
        service.options(options)?;
        Ok(service)
    }

    /// Apply options atomically.
    ///
    /// Holds the write lock while the candidate is built, so readers see
    /// either the old hierarchy or the new one. On success all caches and the
    /// default store memo are dropped.
    pub fn options<I>(&self, options: I) -> ScopeResult<()>
    where
        I: IntoIterator<Item = ScopeOption>,
    {
        let batches = into_batches(options.into_iter().collect()).map_err(|e| {
            warn!(hierarchy = %self.label(), error = %e, "hierarchy source failed");
            e
        })?;

        let mut state = self.write()?;
        let mut websites = (*state.websites).clone();
        let mut groups = (*state.groups).clone();
        let mut stores = (*state.stores).clone();

        let result = batches
            .into_iter()
            .try_for_each(|batch| match batch {
                Batch::Websites(w) => apply(&mut websites, w),
                Batch::Groups(g) => apply(&mut groups, g),
                Batch::Stores(s) => apply(&mut stores, s),
            })
            .and_then(|()| {
                websites.sort();
                groups.sort();
                stores.sort();
                validate_hierarchy(&websites, &groups, &stores)
            });

        if let Err(e) = result {
            warn!(hierarchy = %self.label(), error = %e, "hierarchy rejected");
            return Err(e);
        }

        state.generation += 1;
        state.websites = Arc::new(websites);
        state.groups = Arc::new(groups);
        state.stores = Arc::new(stores);
        state.clear_caches();

        info!(
            hierarchy = %self.label(),
            generation = state.generation,
            websites = state.websites.len(),
            groups = state.groups.len(),
            stores = state.stores.len(),
            "hierarchy loaded"
        );
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
