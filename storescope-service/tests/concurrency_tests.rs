//! Concurrent readers against reloads, resets and cache invalidation.
//!
//! Readers must only ever observe a complete hierarchy or an empty one,
//! never a mix of two loads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use storescope_service::{
    with_groups, with_stores, with_websites, ScopeOption, ScopeType, Service, ServiceConfig,
};
use storescope_test_utils::{fixtures, Fixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn options(fixture: Fixture) -> Vec<ScopeOption> {
    vec![
        with_websites(fixture.websites),
        with_groups(fixture.groups),
        with_stores(fixture.stores),
    ]
}

#[test]
fn readers_see_whole_hierarchies_during_reloads() {
    init_tracing();
    let service = Arc::new(
        Service::with_options(
            ServiceConfig::new().with_label("concurrency"),
            options(fixtures::storefront()),
        )
        .unwrap(),
    );
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut resolved = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    let hierarchy = service.hierarchy().unwrap();
                    let sizes = (
                        hierarchy.websites.len(),
                        hierarchy.groups.len(),
                        hierarchy.stores.len(),
                    );
                    assert!(
                        sizes == (3, 4, 7) || sizes == (1, 1, 1) || sizes == (0, 0, 0),
                        "torn hierarchy: {:?}",
                        sizes
                    );

                    match service.default_store_view() {
                        Ok(store) => {
                            assert_eq!(store.code, "de");
                            resolved += 1;
                        }
                        Err(e) => assert!(e.is_not_found(), "unexpected error: {}", e),
                    }

                    if let Ok(allowed) = service.allowed_stores(ScopeType::Website.with_id(1)) {
                        assert!(allowed.iter().all(|s| s.website_id == 1 && s.is_active));
                    }
                }
                resolved
            })
        })
        .collect();

    for round in 0..50 {
        match round % 3 {
            0 => service.options(options(fixtures::single_store())).unwrap(),
            1 => service.reset(),
            _ => {
                service.invalidate_cache();
                service.options(options(fixtures::storefront())).unwrap();
            }
        }
        thread::yield_now();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
}

#[test]
fn concurrent_lookups_share_cached_records() {
    let service = Arc::new(
        Service::with_options(ServiceConfig::default(), options(fixtures::storefront())).unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.store(4).unwrap())
        })
        .collect();
    let stores: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("lookup thread panicked"))
        .collect();

    // Cache entries share the collection's allocation, so racing fills agree
    let cached = service.store(4).unwrap();
    for store in &stores {
        assert!(Arc::ptr_eq(store, &cached));
    }
    assert_eq!(service.cache_stats().entry_count, 1);
}
