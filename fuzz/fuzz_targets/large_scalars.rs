#![no_main]

use libfuzzer_sys::fuzz_target;
use yaml_registry::{Registry, from_str};

// Long plain and block scalars decoded into a string leaf.
fuzz_target!(|data: &[u8]| {
    if data.len() < 256 {
        return;
    }
    // Cap to 1 MiB generated content.
    let cap: usize = 1 << 20;

    let chunk = String::from_utf8_lossy(data);
    let mut plain = String::new();
    while plain.len() + chunk.len() <= cap {
        plain.push_str(&chunk);
    }

    let registry = Registry::primitives();
    let yaml_plain = format!("{plain}\n");
    let yaml_block = format!("|\n  {plain}\n  {plain}\n");

    for y in [&yaml_plain, &yaml_block] {
        let _s: Result<String, _> = from_str(y, &registry);
    }
});
