//! End-to-end scope resolution.
//!
//! Each test loads a small hierarchy through the public option surface and
//! checks the result a caller would see.

use storescope_service::{
    with_groups, with_source, with_stores, with_websites, Group, ScopeError, ScopeOption,
    ScopeType, Service, ServiceConfig, StaticSource, StorageError, Store, TypeId,
    ValidationError, Website,
};
use storescope_test_utils::{assertions, fixtures, Fixture};

fn options(fixture: Fixture) -> Vec<ScopeOption> {
    vec![
        with_websites(fixture.websites),
        with_groups(fixture.groups),
        with_stores(fixture.stores),
    ]
}

fn storefront() -> Service {
    Service::with_options(ServiceConfig::default(), options(fixtures::storefront()))
        .expect("storefront fixture loads")
}

// ============================================================================
// SCOPE RESOLUTION
// ============================================================================

#[test]
fn default_store_view_follows_default_links() {
    let service = Service::default();
    service.options(options(fixtures::single_store())).unwrap();
    assert_eq!(service.default_store_view().unwrap().code, "de");
}

#[test]
fn inactive_default_store_is_not_found() {
    let mut fixture = fixtures::single_store();
    fixture.stores[0].is_active = false;

    let service = Service::default();
    service.options(options(fixture)).unwrap();
    let result = service.default_store_view();
    assertions::assert_not_found(&result);
    assert_eq!(
        result.unwrap_err(),
        ScopeError::Storage(StorageError::DefaultStoreNotFound)
    );
}

#[test]
fn missing_default_store_rejects_load() {
    let mut fixture = fixtures::single_store();
    fixture.groups[0].default_store_id = 99;

    let service = Service::default();
    let result = service.options(options(fixture));
    assertions::assert_not_valid(&result);
    assert!(service.stores().unwrap().is_empty());
}

#[test]
fn two_default_websites_reject_load() {
    let service = Service::default();
    let result = service.options([
        with_websites([
            Website::new(1, "euro", 1).with_default(true),
            Website::new(2, "oz", 2).with_default(true),
        ]),
        with_groups([Group::new(1, 1, 1), Group::new(2, 2, 2)]),
        with_stores([
            Store::new(1, "de", 1, 1).with_active(true),
            Store::new(2, "au", 2, 2).with_active(true),
        ]),
    ]);
    assertions::assert_not_valid(&result);
    let err = result.unwrap_err();
    assert_eq!(
        err,
        ScopeError::Validation(ValidationError::TooManyDefaultWebsites { ids: vec![1, 2] })
    );
    assert!(err.to_string().contains("Too many default websites"));
}

#[test]
fn allowed_store_limited_to_website() {
    let service = storefront();
    assert_eq!(
        service.is_allowed_store_id(ScopeType::Website.with_id(1), 4).unwrap(),
        (true, "uk".to_string())
    );
    assert_eq!(
        service.is_allowed_store_id(ScopeType::Website.with_id(1), 6).unwrap(),
        (false, String::new())
    );
}

#[test]
fn store_code_resolved_within_group() {
    let service = storefront();
    assert_eq!(
        service.store_id_by_code(ScopeType::Group.with_id(2), "uk").unwrap(),
        (4, 1)
    );
    assertions::assert_not_found(&service.store_id_by_code(ScopeType::Group.with_id(3), "uk"));
}

// ============================================================================
// LOADING AND CACHE MAINTENANCE
// ============================================================================

#[test]
fn absent_scope_code_lookup_covers_whole_default_website() {
    let service = storefront();
    // Neither "at" nor "uk" is the default store view
    assert_eq!(service.default_store_view().unwrap().code, "de");
    assert_eq!(service.store_id_by_code(TypeId::absent(), "at").unwrap(), (2, 1));
    assert_eq!(service.store_id_by_code(TypeId::absent(), "uk").unwrap(), (4, 1));
}

#[test]
fn failed_options_leave_prior_data_intact() {
    let service = storefront();
    let before = service.hierarchy().unwrap();

    let result = service.options([
        with_websites([Website::new(3, "us", 4).with_default(true)]),
        with_groups([Group::new(4, 3, 7)]),
        with_stores([Store::new(7, "us", 3, 4).with_active(true)]),
    ]);
    assertions::assert_not_valid(&result);

    let after = service.hierarchy().unwrap();
    assert_eq!(after.websites.codes(), before.websites.codes());
    assert_eq!(after.stores.codes(), before.stores.codes());
    assert_eq!(service.default_website().unwrap().code, "euro");
}

#[test]
fn reset_then_reload() {
    let service = storefront();
    service.default_store_view().unwrap();
    service.reset();
    assert!(service.is_cache_empty());
    assertions::assert_not_found(&service.default_store_view());

    let fixture = fixtures::single_store();
    service
        .options([with_source(StaticSource::new(
            fixture.websites,
            fixture.groups,
            fixture.stores,
        ))])
        .unwrap();
    assert_eq!(service.default_store_id(TypeId::absent()).unwrap(), (1, 1));
    assert_eq!(service.stores().unwrap().len(), 1);
}

#[test]
fn not_implemented_scopes() {
    let service = storefront();
    assertions::assert_not_implemented(&service.allowed_stores(TypeId::default_scope()));
    assertions::assert_not_implemented(&service.is_allowed_store_id(TypeId::absent(), 1));
}

#[test]
fn codes_only_need_to_be_non_empty() {
    for (website_code, store_code) in [("Euro", "DE"), ("euro-main", "de-at"), ("1", "2nd")] {
        let mut fixture = fixtures::single_store();
        fixture.websites[0].code = website_code.to_string();
        fixture.stores[0].code = store_code.to_string();

        let service = Service::default();
        service.options(options(fixture)).unwrap();
        assert_eq!(service.default_store_view().unwrap().code, store_code);
        assert_eq!(service.store_by_code(store_code).unwrap().store_id, 1);
    }

    let mut fixture = fixtures::single_store();
    fixture.stores[0].code = String::new();
    let result = Service::default().options(options(fixture));
    assert_eq!(
        result.unwrap_err(),
        ScopeError::Validation(ValidationError::EmptyCode {
            entity_type: storescope_service::EntityType::Store,
            id: 1,
        })
    );
}

#[test]
fn independent_services_do_not_share_state() {
    let euro = Service::with_options(
        ServiceConfig::new().with_label("euro"),
        options(fixtures::storefront()),
    )
    .unwrap();
    let empty = Service::new(ServiceConfig::new().with_label("empty")).unwrap();

    euro.store(1).unwrap();
    assert!(!euro.is_cache_empty());
    assert!(empty.is_cache_empty());
    assertions::assert_not_found(&empty.store(1));
}
