//! Fuzz queue loading with arbitrary queue file content.
//!
//! Loading must never panic. A repairing load that succeeds must leave a
//! queue file that loads cleanly again.

#![no_main]

use std::fs;
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use signage::{Config, Queue};

fuzz_target!(|data: &[u8]| {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_root(dir.path());
    fs::create_dir_all(&config.queues_dir).unwrap();
    fs::create_dir_all(&config.slides_dir).unwrap();
    fs::write(config.queues_dir.join("fuzz.json"), data).unwrap();
    let config = Arc::new(config);

    let mut queue = Queue::new(config.clone(), "fuzz").unwrap();
    if queue.load(true).is_ok() {
        let mut again = Queue::new(config, "fuzz").unwrap();
        again.load(false).unwrap();
        assert_eq!(again.len(), queue.len());
    }
});
