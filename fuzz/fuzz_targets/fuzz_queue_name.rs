//! Fuzz the name rule: anything accepted must be safe to use as a file stem.

#![no_main]

use libfuzzer_sys::fuzz_target;
use signage::validation::validate_queue_name;
use signage::Config;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    let config = Config::default();
    if validate_queue_name(&config, name).is_ok() {
        assert!(!name.is_empty());
        assert!(name.len() <= config.queue_name_max_len);
        assert!(!name.starts_with('.'));
        assert!(!name.contains('/') && !name.contains('\\'));
        assert!(name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-'));
    }
});
