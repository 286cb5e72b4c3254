#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use yaml_registry::{Options, Registry, from_str, parse_stream};

// Arbitrary input through both the tree builder and the binder.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = parse_stream(text, &Options::default());

    let registry = Registry::primitives();
    let _: Result<HashMap<String, HashMap<String, String>>, _> = from_str(text, &registry);
    let _: Result<Vec<Option<i64>>, _> = from_str(text, &registry);
});
