//! JSON snapshot of the pending queue.
//!
//! The file is a pretty-printed array of requests in full queue order.
//! Importing enqueues them in that order, so the reloaded queue dequeues
//! identically even where priority and timestamp tie.

use std::path::Path;

use roster_store::{read_substrate, write_atomic};
use tracing::info;

use crate::error::QueueError;
use crate::queue::PriorityQueue;
use crate::request::Request;

pub fn export_json(queue: &PriorityQueue) -> Result<String, QueueError> {
    serde_json::to_string_pretty(&queue.list_all()).map_err(|e| QueueError::Snapshot(e.to_string()))
}

/// Rebuild a queue from [`export_json`] output. Request ids are kept.
pub fn import_json(raw: &str) -> Result<PriorityQueue, QueueError> {
    let requests: Vec<Request> =
        serde_json::from_str(raw).map_err(|e| QueueError::Snapshot(e.to_string()))?;
    let mut queue = PriorityQueue::new();
    queue.bulk_enqueue(requests)?;
    Ok(queue)
}

pub fn save_queue(path: impl AsRef<Path>, queue: &PriorityQueue) -> Result<(), QueueError> {
    let path = path.as_ref();
    let mut body = export_json(queue)?;
    body.push('\n');
    write_atomic(path, body.as_bytes())?;
    info!(path = %path.display(), requests = queue.len(), "queue saved");
    Ok(())
}

pub fn load_queue(path: impl AsRef<Path>) -> Result<PriorityQueue, QueueError> {
    let path = path.as_ref();
    let raw = read_substrate(path)?;
    let queue = import_json(&raw)?;
    info!(path = %path.display(), requests = queue.len(), "queue loaded");
    Ok(queue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestId;
    use chrono::{DateTime, TimeZone, Utc};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, minute, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "roster-queue-{prefix}-{}-{unique}.json",
            std::process::id()
        ))
    }

    #[test]
    fn export_uses_request_wire_shape() {
        let mut queue = PriorityQueue::new();
        queue
            .enqueue(
                Request::new(RequestId(1), 42, "transcript", 1, "Official copy")
                    .with_created_at(at(30)),
            )
            .expect("enqueue");

        let value: serde_json::Value =
            serde_json::from_str(&export_json(&queue).expect("export should succeed"))
                .expect("export is JSON");
        insta::assert_json_snapshot!(value, @r#"
        [
          {
            "created_at": "2024-05-01T08:30:00Z",
            "details": "Official copy",
            "priority": 1,
            "record_key": 42,
            "request_id": 1,
            "request_type": "transcript"
          }
        ]
        "#);
    }

    #[test]
    fn save_and_load_preserve_dequeue_order() {
        let path = temp_path("roundtrip");
        let mut queue = PriorityQueue::new();
        for (id, priority) in [(1, 2), (2, 1), (3, 2), (4, 1), (5, 0)] {
            queue
                .enqueue(Request::new(RequestId(id), 7, "advising", priority, "").with_created_at(at(0)))
                .expect("enqueue");
        }

        save_queue(&path, &queue).expect("save should succeed");
        let mut loaded = load_queue(&path).expect("load should succeed");

        let expected: Vec<RequestId> = std::iter::from_fn(|| queue.dequeue()).map(|r| r.id()).collect();
        let actual: Vec<RequestId> = std::iter::from_fn(|| loaded.dequeue()).map(|r| r.id()).collect();
        assert_eq!(actual, expected);
        assert_eq!(
            actual,
            vec![RequestId(5), RequestId(2), RequestId(4), RequestId(1), RequestId(3)]
        );

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn import_rejects_repeated_ids() {
        let raw = r#"[
            {"request_id": 1, "record_key": 1, "request_type": "a", "priority": 1, "created_at": "2024-05-01T08:00:00Z"},
            {"request_id": 1, "record_key": 2, "request_type": "b", "priority": 1, "created_at": "2024-05-01T08:00:00Z"}
        ]"#;
        assert!(matches!(
            import_json(raw),
            Err(QueueError::DuplicateRequestId(RequestId(1)))
        ));
    }

    #[test]
    fn import_reports_malformed_json() {
        assert!(matches!(import_json("{not json"), Err(QueueError::Snapshot(_))));
    }
}
