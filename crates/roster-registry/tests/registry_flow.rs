use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use roster_queue::{MutationKind, QueueError, RequestId};
use roster_registry::{NewRequest, Registry, RegistryConfig, RegistryError, init_logging};
use roster_store::{Record, RecordKey, StudyYear};
use roster_views::OrderingView;

fn temp_dir(prefix: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "roster-registry-{prefix}-{}-{unique}",
        std::process::id()
    ))
}

fn student(key: RecordKey, name: &str, year: u8) -> Record {
    Record::new(
        key,
        name,
        format!("{}@uni.edu", name.to_lowercase()),
        StudyYear(year),
        key % 2 == 1,
    )
}

fn pending_ids(registry: &Registry) -> Vec<RequestId> {
    registry.pending().iter().map(|r| r.id()).collect()
}

#[test]
fn save_and_reopen_preserves_records_history_and_queue() {
    init_logging("debug");
    let dir = temp_dir("roundtrip");
    let config = RegistryConfig::default().rooted_at(&dir);

    let mut registry = Registry::open(config.clone()).expect("open empty registry");
    for (key, name, year) in [(3, "Maya", 2), (1, "Ada", 1), (4, "Linus", 3), (5, "Grace", 1)] {
        registry.create_record(student(key, name, year)).expect("create");
    }
    assert!(matches!(
        registry.create_record(student(1, "Dup", 1)),
        Err(RegistryError::Store(_))
    ));

    registry.enroll(3, "CS101").expect("enroll");
    registry.enroll(3, "ma201").expect("enroll");
    registry.withdraw(3, "CS101").expect("withdraw");
    registry.enroll(1, "CS101").expect("enroll");

    registry
        .submit_requests([
            NewRequest::new(3, "advising", 2, "A"),
            NewRequest::new(1, "transcript", 1, "B"),
            NewRequest::new(4, "advising", 2, "C"),
        ])
        .expect("bulk submit");
    registry.save().expect("save");

    let reopened = Registry::open(config).expect("reopen");
    assert_eq!(reopened.snapshot_ref(), registry.snapshot_ref());
    assert_eq!(reopened.store().render_shape(), registry.store().render_shape());
    assert_eq!(
        reopened.records().map(Record::key).collect::<Vec<_>>(),
        vec![1, 3, 4, 5]
    );

    let maya = reopened.record(3).expect("record 3 survives");
    assert_eq!(maya.courses().to_vec(), vec!["MA201"]);
    let lines = maya.history().history_lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(": REMOVE CS101"));
    assert!(lines[2].ends_with(": ADD CS101"));

    let details: Vec<&str> = reopened.pending().iter().map(|r| r.details.as_str()).collect();
    assert_eq!(details, vec!["B", "A", "C"]);
    assert!(!reopened.can_undo());
    assert!(reopened.check_integrity().accepted());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn reopened_registry_never_reissues_imported_ids() {
    let dir = temp_dir("ids");
    let config = RegistryConfig::default().rooted_at(&dir);

    let mut registry = Registry::new(config.clone());
    registry.create_record(student(1, "Ada", 1)).expect("create");
    for _ in 0..3 {
        registry
            .submit_request(NewRequest::new(1, "advising", 1, ""))
            .expect("submit");
    }
    registry.save().expect("save");

    let mut reopened = Registry::open(config).expect("reopen");
    let next = reopened
        .submit_request(NewRequest::new(1, "advising", 1, ""))
        .expect("submit after reopen");
    assert_eq!(next, RequestId(4));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn sorted_inserts_degenerate_and_survive_reload() {
    let dir = temp_dir("chain");
    let config = RegistryConfig::default().rooted_at(&dir);

    let mut registry = Registry::new(config.clone());
    for key in 1..=64 {
        registry
            .create_record(student(key, &format!("S{key}"), 1))
            .expect("create");
    }
    assert_eq!(registry.store().height(), 64);
    registry.save().expect("save");

    let reopened = Registry::open(config).expect("reopen");
    assert_eq!(reopened.store().height(), 64);
    assert_eq!(reopened.record_count(), 64);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn undo_redo_walks_serve_history() {
    let mut registry = Registry::new(RegistryConfig::default());
    registry.create_record(student(1, "Ada", 1)).expect("create");
    let ids = registry
        .submit_requests([
            NewRequest::new(1, "advising", 2, "A"),
            NewRequest::new(1, "advising", 1, "B"),
            NewRequest::new(1, "advising", 2, "C"),
        ])
        .expect("bulk submit");
    let before = pending_ids(&registry);

    let served = registry.serve_next().expect("serve");
    assert_eq!(served.details, "B");

    let undone = registry.undo().expect("undo serve");
    assert_eq!(undone.kind, MutationKind::Dequeued);
    assert_eq!(pending_ids(&registry), before);

    registry.redo().expect("redo serve");
    assert_eq!(pending_ids(&registry), vec![ids[0], ids[2]]);

    registry.undo().expect("undo serve");
    registry.undo().expect("undo submit C");
    registry.undo().expect("undo submit B");
    assert_eq!(pending_ids(&registry), vec![ids[0]]);
    registry.redo().expect("redo submit B");
    registry.redo().expect("redo submit C");
    assert_eq!(pending_ids(&registry), before);

    registry.serve_next().expect("serve");
    assert!(matches!(
        registry.redo(),
        Err(RegistryError::Queue(QueueError::NothingToRedo))
    ));
}

#[test]
fn views_order_a_copy_of_the_records() {
    let mut registry = Registry::new(RegistryConfig::default());
    for (key, name, year) in [(3, "maya", 2), (1, "Ada", 1), (4, "ada", 2), (2, "Bo", 1)] {
        registry.create_record(student(key, name, year)).expect("create");
    }
    registry.enroll(4, "CS101").expect("enroll");
    registry.enroll(4, "MA201").expect("enroll");
    registry.enroll(1, "CS101").expect("enroll");

    let keys = |records: Vec<Record>| records.iter().map(Record::key).collect::<Vec<_>>();
    assert_eq!(keys(registry.ordered(OrderingView::ByStudyYear)), vec![1, 2, 3, 4]);
    assert_eq!(keys(registry.ordered(OrderingView::ByYearThenName)), vec![1, 2, 4, 3]);
    assert_eq!(registry.ordered(OrderingView::ByCourseLoad)[0].key(), 4);
    assert_eq!(
        keys(registry.ordered(OrderingView::CourseLoadInYear(StudyYear(2)))),
        vec![3, 4]
    );
    assert!(
        registry
            .ordered(OrderingView::CourseLoadInYear(StudyYear(4)))
            .is_empty()
    );
    assert_eq!(
        registry.records().map(Record::key).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn config_file_drives_paths() {
    let dir = temp_dir("config");
    std::fs::create_dir_all(&dir).expect("temp dir");
    let config_path = dir.join("roster.toml");
    let records = dir.join("data").join("students.jsonl");
    std::fs::write(
        &config_path,
        format!(
            "records_path = {:?}\nvalidate_fields = false\n",
            records.display().to_string()
        ),
    )
    .expect("config write");

    let config = RegistryConfig::load(&config_path).expect("config load");
    assert_eq!(config.records_path, records);

    let mut registry = Registry::new(RegistryConfig {
        requests_path: dir.join("data").join("queue.json"),
        ..config
    });
    registry
        .create_record(Record::new(1, "Ada", "ada at uni", StudyYear(1), true))
        .expect("validation disabled");
    registry.save().expect("save");
    assert!(records.exists());

    let raw = std::fs::read_to_string(dir.join("data").join("queue.json")).expect("queue file");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("queue file is JSON");
    assert_eq!(parsed, serde_json::json!([]));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn open_installs_subscriber_from_configured_filter() {
    let dir = temp_dir("logging");
    let config = RegistryConfig::from_toml_str("log_filter = \"roster_registry=warn\"\n")
        .expect("config parse")
        .rooted_at(&dir);
    assert_eq!(config.log_filter, "roster_registry=warn");

    let registry = Registry::open(config).expect("open empty registry");
    assert_eq!(registry.config().log_filter, "roster_registry=warn");
    // Open leaves a subscriber installed.
    assert!(!init_logging("trace"));
}
