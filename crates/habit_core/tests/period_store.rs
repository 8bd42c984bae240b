mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::FlakyAdapter;
use habit_core::notifications::{MemoryNotifier, NoticeLevel};
use habit_core::storage::FsAdapter;
use habit_core::store::PeriodStore;
use habit_core::{habits, DayStatus, PeriodDocument, PeriodId};
use tempfile::tempdir;

fn store_at(root: &Path) -> (PeriodStore, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let store = PeriodStore::new(root, Arc::new(FsAdapter), notifier.clone());
    (store, notifier)
}

fn period(id: &str) -> PeriodId {
    id.parse().expect("valid period id")
}

#[test]
fn first_read_materializes_an_empty_document() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("HabitTracker");
    let (store, notifier) = store_at(&root);

    let id = period("2024-03");
    let doc = store.read(&id);
    assert_eq!(doc, PeriodDocument::new());

    let path = root.join("months").join("2024-03.json");
    assert!(path.exists(), "read must leave a file behind");
    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        stored,
        serde_json::json!({"habits": [], "states": {}, "order": [], "version": 1})
    );
    assert!(!root.join("weeks").exists());
    assert!(notifier.drain().is_empty());
}

#[test]
fn ensure_directories_is_idempotent() {
    let temp = tempdir().expect("tempdir");
    let (store, _) = store_at(temp.path());
    store
        .ensure_directories(habit_core::PeriodMode::Week)
        .unwrap();
    store
        .ensure_directories(habit_core::PeriodMode::Week)
        .unwrap();
    assert!(temp.path().join("weeks").is_dir());
}

#[test]
fn written_documents_read_back_identically() {
    let temp = tempdir().expect("tempdir");
    let (store, _) = store_at(temp.path());
    let id = period("2024-03-W2");

    let mut doc = PeriodDocument::new();
    habits::add_habit(&mut doc, "Read").unwrap();
    habits::add_habit(&mut doc, "Run").unwrap();
    habits::reorder(&mut doc, "Run", "Read");
    habits::toggle_day(&mut doc, "Read", 5).unwrap();
    habits::toggle_day(&mut doc, "Run", 6).unwrap();
    habits::toggle_day(&mut doc, "Run", 6).unwrap();

    assert!(store.write(&id, &doc));
    let back = store.read(&id);
    assert_eq!(back.habits, doc.habits);
    assert_eq!(back.order, vec!["Run", "Read"]);
    assert_eq!(back.states, doc.states);
    assert_eq!(back.status("Run", 6), DayStatus::Skipped);
    assert!(temp.path().join("weeks").join("2024-03-W2.json").exists());
}

#[test]
fn repeated_reads_do_not_touch_the_file() {
    let temp = tempdir().expect("tempdir");
    let (store, _) = store_at(temp.path());
    let id = period("2024-05");
    let path = store.path_for(&id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let raw = r#"{"habits":["Read"],"order":["Read"],"states":{"Read":{"3":1}},"version":1}"#;
    fs::write(&path, raw).unwrap();

    let first = store.read(&id);
    let second = store.read(&id);
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&path).unwrap(), raw);
}

#[test]
fn order_is_reconciled_on_read() {
    let temp = tempdir().expect("tempdir");
    let (store, _) = store_at(temp.path());
    let id = period("2024-06");
    let path = store.path_for(&id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"habits": ["Read", "Run", "Stretch"], "order": ["Run", "Retired", "Read"]}"#,
    )
    .unwrap();

    let doc = store.read(&id);
    assert_eq!(doc.order, vec!["Run", "Read", "Stretch"]);
    assert!(doc.states.is_empty());
    assert_eq!(doc.version, 1);
}

#[test]
fn corrupt_file_is_reported_and_left_alone() {
    let temp = tempdir().expect("tempdir");
    let (store, notifier) = store_at(temp.path());
    let id = period("2024-07");
    let path = store.path_for(&id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(store.read(&id), PeriodDocument::new());
    assert!(store.try_read(&id).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

    let notices = notifier.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
}

#[test]
fn failed_write_is_reported_not_raised() {
    let temp = tempdir().expect("tempdir");
    let adapter = Arc::new(FlakyAdapter::default());
    let notifier = Arc::new(MemoryNotifier::new());
    let store = PeriodStore::new(temp.path(), adapter.clone(), notifier.clone());
    let id = period("2024-08");

    adapter.fail_writes(true);
    let mut doc = PeriodDocument::new();
    habits::add_habit(&mut doc, "Read").unwrap();
    assert!(!store.write(&id, &doc));
    assert!(!store.path_for(&id).exists());
    assert_eq!(notifier.messages(), vec!["failed to save tracker data"]);

    // Materialization failure falls back to an unsaved empty document.
    assert_eq!(store.read(&id), PeriodDocument::new());
    assert_eq!(notifier.drain().len(), 2);
}
