//! Fuzz test for YAML hierarchy loading
//!
//! Feeds arbitrary documents through `StaticSource::from_yaml_str` and, when
//! they decode, through `Service::options`. Neither step may panic, and a
//! rejected load must leave the service empty.
//!
//! Run with: cargo +nightly fuzz run hierarchy_yaml_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use storescope_service::{with_source, Service, StaticSource, TypeId};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(source) = StaticSource::from_yaml_str(input) else {
        return;
    };

    let service = Service::default();
    match service.options([with_source(source)]) {
        Ok(()) => {
            let hierarchy = service.hierarchy().expect("lock is healthy");
            if !hierarchy.websites.is_empty() {
                assert_eq!(hierarchy.websites.iter().filter(|w| w.is_default).count(), 1);
            }
            // Resolution may fail on inactive stores but must not panic
            let _ = service.default_store_view();
            let _ = service.store_id_by_code(TypeId::absent(), "default");
        }
        Err(_) => {
            assert!(service.websites().expect("lock is healthy").is_empty());
            assert!(service.stores().expect("lock is healthy").is_empty());
        }
    }
});
