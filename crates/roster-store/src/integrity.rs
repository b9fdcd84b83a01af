//! Structural integrity check over an [`OrderedStore`].
//!
//! Unlike traversal, which panics on the first broken invariant, the check
//! walks the raw arena and reports every finding it can reach.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::record::RecordKey;
use crate::tree::OrderedStore;

pub const INTEGRITY_CHECK_KIND: &str = "roster.store.integrity.v1";

pub const FAILURE_CLASS_KEY_ORDER: &str = "store.key_order.violated";
pub const FAILURE_CLASS_CYCLE: &str = "store.link.cycle";
pub const FAILURE_CLASS_DANGLING: &str = "store.link.dangling";
pub const FAILURE_CLASS_COUNT_MISMATCH: &str = "store.count.mismatch";
pub const FAILURE_CLASS_DUPLICATE_COURSE: &str = "record.courses.duplicate";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityFinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<RecordKey>,
    pub class: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegritySummary {
    pub record_count: usize,
    pub reachable_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub check_kind: String,
    pub result: String,
    pub failure_classes: Vec<String>,
    pub findings: Vec<IntegrityFinding>,
    pub summary: IntegritySummary,
}

impl IntegrityReport {
    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}

pub fn check_store(store: &OrderedStore) -> IntegrityReport {
    let mut findings = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(usize, Option<RecordKey>, Option<RecordKey>)> = store
        .root_slot()
        .map(|id| (id, None, None))
        .into_iter()
        .collect();

    while let Some((id, low, high)) = stack.pop() {
        if !visited.insert(id) {
            findings.push(IntegrityFinding {
                key: None,
                class: FAILURE_CLASS_CYCLE.to_string(),
                message: format!("slot {id} is reachable more than once"),
            });
            continue;
        }
        let Some((record, left, right)) = store.slot(id) else {
            findings.push(IntegrityFinding {
                key: None,
                class: FAILURE_CLASS_DANGLING.to_string(),
                message: format!("link points at empty slot {id}"),
            });
            continue;
        };

        let key = record.key();
        let below_low = low.is_some_and(|low| key <= low);
        let above_high = high.is_some_and(|high| key >= high);
        if below_low || above_high {
            findings.push(IntegrityFinding {
                key: Some(key),
                class: FAILURE_CLASS_KEY_ORDER.to_string(),
                message: format!("key {key} lies outside its subtree bounds ({low:?}, {high:?})"),
            });
        }

        let mut seen = BTreeSet::new();
        for course in record.courses() {
            if !seen.insert(course.as_str()) {
                findings.push(IntegrityFinding {
                    key: Some(key),
                    class: FAILURE_CLASS_DUPLICATE_COURSE.to_string(),
                    message: format!("course {course} appears more than once"),
                });
            }
        }

        stack.extend(left.map(|child| (child, low, Some(key))));
        stack.extend(right.map(|child| (child, Some(key), high)));
    }

    if visited.len() != store.len() {
        findings.push(IntegrityFinding {
            key: None,
            class: FAILURE_CLASS_COUNT_MISMATCH.to_string(),
            message: format!(
                "store reports {} records but {} slots are reachable",
                store.len(),
                visited.len()
            ),
        });
    }

    let failure_classes: Vec<String> = findings
        .iter()
        .map(|finding| finding.class.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    IntegrityReport {
        check_kind: INTEGRITY_CHECK_KIND.to_string(),
        result: if findings.is_empty() {
            "accepted".to_string()
        } else {
            "rejected".to_string()
        },
        failure_classes,
        findings,
        summary: IntegritySummary {
            record_count: store.len(),
            reachable_count: visited.len(),
        },
    }
}
