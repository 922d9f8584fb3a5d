//! Integration tests for queue persistence: load (with and without repair),
//! write, cascading removal and directory listing.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use signage::{Config, Queue, SignageError, Slide, SlideId, StorageError, ValidationError};
use tempfile::{tempdir, TempDir};

/// Helper: a config rooted in a fresh temp dir with both directories created.
fn setup() -> (Arc<Config>, TempDir) {
    let dir = tempdir().unwrap();
    let config = Config::with_root(dir.path());
    fs::create_dir_all(&config.queues_dir).unwrap();
    fs::create_dir_all(&config.slides_dir).unwrap();
    (Arc::new(config), dir)
}

fn queue_file(config: &Config, name: &str) -> PathBuf {
    config.queues_dir.join(format!("{name}.json"))
}

fn slide_file(config: &Config, id: &SlideId) -> PathBuf {
    config.slides_dir.join(format!("{id}.json"))
}

fn stored_slide(config: &Arc<Config>, index: usize) -> Slide {
    let mut slide = Slide::new(config.clone(), "alice", "sign1").unwrap();
    slide.set_index(index);
    slide.write().unwrap();
    slide
}

/// Writes a queue named `sign1` owned by alice holding `slides`.
fn stored_queue(config: &Arc<Config>, slides: &[&Slide]) -> Queue {
    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.set_owner("alice").unwrap();
    for slide in slides {
        queue.add((*slide).clone());
    }
    queue.write().unwrap();
    queue
}

fn stored_ids(config: &Config, name: &str) -> Vec<String> {
    let doc: serde_json::Value =
        serde_json::from_slice(&fs::read(queue_file(config, name)).unwrap()).unwrap();
    doc["slides"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Write
// ============================================================================

#[test]
fn test_write_document_shape() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    stored_queue(&config, &[&a]);

    let doc: serde_json::Value =
        serde_json::from_slice(&fs::read(queue_file(&config, "sign1")).unwrap()).unwrap();
    assert_eq!(
        doc,
        serde_json::json!({ "owner": "alice", "slides": [a.id().as_str()] })
    );
}

#[test]
fn test_write_overwrites_previous_document() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    let b = stored_slide(&config, 1);
    let mut queue = stored_queue(&config, &[&a, &b]);

    queue.remove_slide(a.id());
    queue.write().unwrap();

    assert_eq!(stored_ids(&config, "sign1"), vec![b.id().to_string()]);
}

#[test]
fn test_write_without_owner_is_argument_error() {
    let (config, _dir) = setup();
    let queue = Queue::new(config.clone(), "sign1").unwrap();

    let err = queue.write().unwrap_err();
    assert!(err.is_validation());
    assert!(!queue_file(&config, "sign1").exists());
}

// ============================================================================
// Load
// ============================================================================

#[test]
fn test_load_missing_file_is_argument_error() {
    let (config, _dir) = setup();
    let mut queue = Queue::new(config, "sign1").unwrap();

    let err = queue.load(false).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.is_argument());
}

#[test]
fn test_load_empty_queue_file_is_not_found() {
    let (config, _dir) = setup();
    // A creator has made the file but not yet written it
    fs::File::create(queue_file(&config, "sign1")).unwrap();

    let mut queue = Queue::new(config, "sign1").unwrap();
    let err = queue.load(true).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.is_argument());
}

#[test]
fn test_create_refuses_existing_file() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    stored_queue(&config, &[&a]);

    let mut fresh = Queue::new(config.clone(), "sign1").unwrap();
    fresh.set_owner("bob").unwrap();
    let err = fresh.create().unwrap_err();
    assert!(matches!(
        err,
        SignageError::Validation(ValidationError::AlreadyExists { .. })
    ));
    assert_eq!(stored_ids(&config, "sign1"), vec![a.id().to_string()]);
}

#[test]
fn test_load_corrupt_queue_is_internal_error() {
    let (config, _dir) = setup();
    fs::write(queue_file(&config, "sign1"), b"[1, 2").unwrap();

    let mut queue = Queue::new(config, "sign1").unwrap();
    let err = queue.load(true).unwrap_err();
    assert!(matches!(err, SignageError::Storage(StorageError::Corrupted(_))));
}

#[test]
fn test_load_fix_errors_round_trip() {
    let (config, _dir) = setup();
    let valid = stored_slide(&config, 0);
    let missing = stored_slide(&config, 1);
    stored_queue(&config, &[&valid, &missing]);
    fs::remove_file(slide_file(&config, missing.id())).unwrap();

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.load(true).unwrap();

    assert!(queue.is_loaded());
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.slides()[0].id(), valid.id());
    assert_eq!(stored_ids(&config, "sign1"), vec![valid.id().to_string()]);
}

#[test]
fn test_load_without_fix_errors_fails_and_leaves_queue_unusable() {
    let (config, _dir) = setup();
    let valid = stored_slide(&config, 0);
    let missing = stored_slide(&config, 1);
    stored_queue(&config, &[&valid, &missing]);
    fs::remove_file(slide_file(&config, missing.id())).unwrap();

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    let err = queue.load(false).unwrap_err();
    assert!(err.is_not_found());
    assert!(!queue.is_loaded());

    // Not loaded, so it cannot be removed
    assert!(queue.remove().unwrap_err().is_internal());

    // Nothing was rewritten
    assert_eq!(stored_ids(&config, "sign1").len(), 2);
}

#[test]
fn test_load_fix_errors_drops_corrupt_slide() {
    let (config, _dir) = setup();
    let valid = stored_slide(&config, 0);
    let corrupt = stored_slide(&config, 1);
    stored_queue(&config, &[&valid, &corrupt]);
    fs::write(slide_file(&config, corrupt.id()), b"{ oops").unwrap();

    let mut strict = Queue::new(config.clone(), "sign1").unwrap();
    assert!(strict.load(false).unwrap_err().is_internal());

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.load(true).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(stored_ids(&config, "sign1"), vec![valid.id().to_string()]);
}

#[test]
fn test_load_clean_queue_is_not_rewritten() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    stored_queue(&config, &[&a]);

    // Compact JSON: a rewrite would pretty-print it
    let compact = format!(r#"{{"owner":"alice","slides":["{}"]}}"#, a.id());
    fs::write(queue_file(&config, "sign1"), &compact).unwrap();

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.load(true).unwrap();

    assert_eq!(
        fs::read_to_string(queue_file(&config, "sign1")).unwrap(),
        compact
    );
}

// ============================================================================
// Remove
// ============================================================================

#[test]
fn test_remove_cascades_to_slides() {
    let (config, _dir) = setup();
    let slides: Vec<Slide> = (0..4).map(|i| stored_slide(&config, i)).collect();
    let refs: Vec<&Slide> = slides.iter().collect();
    stored_queue(&config, &refs);

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.load(false).unwrap();
    queue.remove().unwrap();

    assert!(!queue_file(&config, "sign1").exists());
    for slide in &slides {
        assert!(!slide_file(&config, slide.id()).exists());
    }
    assert!(!queue.is_loaded());
}

#[test]
fn test_remove_before_load_is_internal_error() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    let mut queue = stored_queue(&config, &[&a]);

    let err = queue.remove().unwrap_err();
    assert!(err.is_internal());
    assert!(queue_file(&config, "sign1").exists());
    assert!(slide_file(&config, a.id()).exists());
}

#[test]
fn test_remove_after_out_of_band_delete_is_argument_error() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    stored_queue(&config, &[&a]);

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.load(false).unwrap();
    fs::remove_file(queue_file(&config, "sign1")).unwrap();

    let err = queue.remove().unwrap_err();
    assert!(err.is_not_found());
    // Slides are only removed once the queue file is known to exist
    assert!(slide_file(&config, a.id()).exists());
}

#[test]
fn test_remove_partial_failure_can_be_retried() {
    let (config, _dir) = setup();
    let a = stored_slide(&config, 0);
    let b = stored_slide(&config, 1);
    stored_queue(&config, &[&a, &b]);

    let mut queue = Queue::new(config.clone(), "sign1").unwrap();
    queue.load(false).unwrap();

    // Second slide disappears behind our back
    fs::remove_file(slide_file(&config, b.id())).unwrap();
    let err = queue.remove().unwrap_err();
    assert!(err.is_not_found());
    assert!(queue_file(&config, "sign1").exists());
    assert!(!slide_file(&config, a.id()).exists());

    // A fresh, repairing load prunes the dead reference; removal completes
    let mut retry = Queue::new(config.clone(), "sign1").unwrap();
    retry.load(true).unwrap();
    assert!(retry.is_empty());
    retry.remove().unwrap();
    assert!(!queue_file(&config, "sign1").exists());
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_list_scenario() {
    let (config, _dir) = setup();
    fs::write(config.queues_dir.join("q1.json"), "{}").unwrap();
    fs::write(config.queues_dir.join(".hidden.json"), "{}").unwrap();
    fs::write(config.queues_dir.join("notjson.txt"), "").unwrap();

    assert_eq!(Queue::list(&config).unwrap(), vec!["q1".to_string()]);
}

#[test]
fn test_list_and_exists_follow_writes() {
    let (config, _dir) = setup();
    for name in ["lobby", "front-desk", "cafe_2"] {
        let mut queue = Queue::new(config.clone(), name).unwrap();
        queue.set_owner("alice").unwrap();
        queue.write().unwrap();
    }

    let mut names = Queue::list(&config).unwrap();
    names.sort();
    assert_eq!(names, vec!["cafe_2", "front-desk", "lobby"]);
    assert!(Queue::exists(&config, "lobby").unwrap());
    assert!(!Queue::exists(&config, "atrium").unwrap());
}
