//! Fuzz target for cache file decoding.
//!
//! Cache files survive across runs and can be truncated by a crash or
//! edited by hand; decoding must return an error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ti_cache::decode;

fuzz_target!(|data: &[u8]| {
    if let Ok(file) = decode(data) {
        // Whatever decodes must encode again.
        let _ = serde_json::to_vec(&file).expect("decoded cache re-encodes");
    }
});
