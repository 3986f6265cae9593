//! storescope Test Utilities
//!
//! Shared test infrastructure for the storescope workspace:
//! - Fixtures for the hierarchies the test suites use
//! - Proptest generators for records, scope selectors and whole hierarchies
//! - Custom assertions for hierarchy invariants and error kinds

// Re-export core types for convenience
pub use storescope_core::{
    Collection, Entity, EntityType, Group, GroupCollection, GroupId, ScopeError, ScopeResult,
    ScopeType, ServiceConfig, StorageError, Store, StoreCollection, StoreId, TypeId,
    ValidationError, Website, WebsiteCollection, WebsiteId, ADMIN_STORE_ID,
};

/// Raw records for one hierarchy, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixture {
    pub websites: Vec<Website>,
    pub groups: Vec<Group>,
    pub stores: Vec<Store>,
}

impl Fixture {
    /// Sorted collections, as a service would hold them.
    pub fn collections(&self) -> (WebsiteCollection, GroupCollection, StoreCollection) {
        (
            Collection::from(self.websites.clone()).sorted(),
            Collection::from(self.groups.clone()).sorted(),
            Collection::from(self.stores.clone()).sorted(),
        )
    }

    pub fn default_website(&self) -> Option<&Website> {
        self.websites.iter().find(|w| w.is_default)
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built hierarchies.

    use super::*;

    /// One website, one group, one active store coded `de`.
    pub fn single_store() -> Fixture {
        Fixture {
            websites: vec![Website::new(1, "euro", 1).with_default(true)],
            groups: vec![Group::new(1, 1, 1)],
            stores: vec![Store::new(1, "de", 1, 1).with_active(true)],
        }
    }

    /// Admin website plus two storefront websites.
    ///
    /// | website  | group     | stores                          |
    /// |----------|-----------|---------------------------------|
    /// | 0 admin  | 0         | 0 admin                         |
    /// | 1 euro * | 1 DACH    | 1 de, 2 at, 3 ch (inactive)     |
    /// | 1 euro * | 2 UK      | 4 uk                            |
    /// | 2 oz     | 3 Oceania | 5 au, 6 nz                      |
    ///
    /// `*` marks the default website. Group defaults are the first store
    /// listed.
    pub fn storefront() -> Fixture {
        Fixture {
            websites: vec![
                Website::new(0, "admin", 0).with_name("Admin"),
                Website::new(1, "euro", 1)
                    .with_name("Europe")
                    .with_sort_order(10)
                    .with_default(true),
                Website::new(2, "oz", 3).with_name("Oceania").with_sort_order(20),
            ],
            groups: vec![
                Group::new(0, 0, 0).with_name("Default"),
                Group::new(1, 1, 1).with_name("DACH").with_root_category(2),
                Group::new(2, 1, 4).with_name("UK").with_root_category(2),
                Group::new(3, 2, 5).with_name("Oceania").with_root_category(3),
            ],
            stores: vec![
                Store::new(0, "admin", 0, 0).with_name("Admin").with_active(true),
                Store::new(1, "de", 1, 1)
                    .with_name("Germany")
                    .with_sort_order(10)
                    .with_active(true),
                Store::new(2, "at", 1, 1)
                    .with_name("Austria")
                    .with_sort_order(20)
                    .with_active(true),
                Store::new(3, "ch", 1, 1)
                    .with_name("Switzerland")
                    .with_sort_order(30),
                Store::new(4, "uk", 1, 2).with_name("United Kingdom").with_active(true),
                Store::new(5, "au", 2, 3)
                    .with_name("Australia")
                    .with_sort_order(10)
                    .with_active(true),
                Store::new(6, "nz", 2, 3)
                    .with_name("New Zealand")
                    .with_sort_order(20)
                    .with_active(true),
            ],
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating storescope types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a non-empty code, mixing case, digits and separators.
    pub fn arb_code() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9_-]{0,11}"
    }

    pub fn arb_scope_type() -> impl Strategy<Value = ScopeType> {
        prop_oneof![
            Just(ScopeType::Absent),
            Just(ScopeType::Default),
            Just(ScopeType::Website),
            Just(ScopeType::Group),
            Just(ScopeType::Store),
        ]
    }

    pub fn arb_type_id() -> impl Strategy<Value = TypeId> {
        (arb_scope_type(), any::<u32>()).prop_map(|(scope, id)| scope.with_id(id))
    }

    /// Generate a standalone store record; not guaranteed to fit any
    /// hierarchy.
    pub fn arb_store() -> impl Strategy<Value = Store> {
        (
            any::<u32>(),
            arb_code(),
            0u32..8,
            0u32..8,
            0u32..100,
            any::<bool>(),
        )
            .prop_map(|(store_id, code, website_id, group_id, sort_order, active)| {
                Store::new(store_id, code, website_id, group_id)
                    .with_sort_order(sort_order)
                    .with_active(active)
            })
    }

    /// Per store: (sort order, active). Per group: its stores. Per website:
    /// its groups.
    type Shape = Vec<Vec<Vec<(u32, bool)>>>;

    fn arb_shape() -> impl Strategy<Value = Shape> {
        let stores = prop::collection::vec((0u32..100, any::<bool>()), 1..4);
        let groups = prop::collection::vec(stores, 1..3);
        prop::collection::vec(groups, 1..4)
    }

    fn build(shape: Shape, default_index: usize) -> Fixture {
        let mut fixture = Fixture::default();
        let mut next_group: GroupId = 1;
        let mut next_store: StoreId = 1;

        for (w, groups) in shape.into_iter().enumerate() {
            let website_id = w as WebsiteId + 1;
            fixture.websites.push(
                Website::new(website_id, format!("w{website_id}"), next_group)
                    .with_sort_order(website_id * 10)
                    .with_default(w == default_index),
            );

            for stores in groups {
                let group_id = next_group;
                next_group += 1;
                fixture
                    .groups
                    .push(Group::new(group_id, website_id, next_store));

                for (sort_order, active) in stores {
                    let store_id = next_store;
                    next_store += 1;
                    fixture.stores.push(
                        Store::new(store_id, format!("s{store_id}"), website_id, group_id)
                            .with_sort_order(sort_order)
                            .with_active(active),
                    );
                }
            }
        }
        fixture
    }

    /// Generate a hierarchy that passes validation: unique ids and codes,
    /// closed references and exactly one default website.
    pub fn arb_hierarchy() -> impl Strategy<Value = Fixture> {
        arb_shape()
            .prop_flat_map(|shape| {
                let websites = shape.len();
                (Just(shape), 0..websites)
            })
            .prop_map(|(shape, default_index)| build(shape, default_index))
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for hierarchy invariants and error kinds.

    use super::*;
    use std::collections::HashSet;

    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &ScopeResult<T>) {
        match result {
            Err(e) if e.is_not_found() => {}
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_not_valid<T: std::fmt::Debug>(result: &ScopeResult<T>) {
        match result {
            Err(e) if e.is_not_valid() => {}
            other => panic!("Expected NotValid, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_not_implemented<T: std::fmt::Debug>(result: &ScopeResult<T>) {
        match result {
            Err(e) if e.is_not_implemented() => {}
            other => panic!("Expected NotImplemented, got: {:?}", other),
        }
    }

    /// Assert that no two records in `collection` share a primary key.
    #[track_caller]
    pub fn assert_unique_ids<T: Entity>(collection: &Collection<T>) {
        let mut seen = HashSet::new();
        for id in collection.ids() {
            assert!(seen.insert(id), "Duplicate {:?} id {}", T::entity_type(), id);
        }
    }

    /// Assert that every store's group belongs to the store's website.
    #[track_caller]
    pub fn assert_referential_closure(groups: &GroupCollection, stores: &StoreCollection) {
        for store in stores {
            let group = groups
                .by_id(store.group_id)
                .unwrap_or_else(|| panic!("Store {} has no group {}", store.store_id, store.group_id));
            assert_eq!(
                group.website_id, store.website_id,
                "Store {} is in website {} but its group {} is in website {}",
                store.store_id, store.website_id, group.group_id, group.website_id
            );
        }
    }

    /// Assert that a non-empty website collection has exactly one default.
    #[track_caller]
    pub fn assert_single_default(websites: &WebsiteCollection) {
        if websites.is_empty() {
            return;
        }
        let defaults = websites.iter().filter(|w| w.is_default).count();
        assert_eq!(defaults, 1, "Expected exactly one default website, got {}", defaults);
    }

    /// Assert that `collection` is in its natural order.
    #[track_caller]
    pub fn assert_sorted<T: Entity>(collection: &Collection<T>) {
        let keys: Vec<_> = collection.iter().map(|e| e.sort_key()).collect();
        assert!(
            keys.windows(2).all(|pair| pair[0] <= pair[1]),
            "{:?} collection is not sorted",
            T::entity_type()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
