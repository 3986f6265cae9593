//! Fuzz test for scope selector parsing
//!
//! Any string that parses as a `TypeId` must print back to a string that
//! parses to the same value, and packing must be reversible.
//!
//! Run with: cargo +nightly fuzz run type_id_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use storescope_core::TypeId;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(type_id) = input.parse::<TypeId>() {
            let reparsed: TypeId = type_id.to_string().parse().expect("display output parses");
            assert_eq!(reparsed.scope(), type_id.scope());
            assert_eq!(TypeId::from_packed(type_id.pack()), Some(type_id));
        }
    }

    if data.len() >= 8 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&data[..8]);
        if let Some(type_id) = TypeId::from_packed(u64::from_le_bytes(bytes)) {
            assert_eq!(type_id.pack(), u64::from_le_bytes(bytes));
        }
    }
});
