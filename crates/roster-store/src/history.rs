//! Per-record course history: an append-only event chain.
//!
//! Events are stored oldest-first and walked newest-first, which is the
//! only direction the chain is ever read in. Nothing removes a single
//! event; the chain lives and dies with its owning record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a course code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseAction {
    Add,
    Remove,
}

impl CourseAction {
    pub fn as_str(&self) -> &str {
        match self {
            CourseAction::Add => "add",
            CourseAction::Remove => "remove",
        }
    }
}

/// One change to a record's course set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEvent {
    pub course_code: String,
    pub action: CourseAction,
    pub occurred_at: DateTime<Utc>,
}

impl CourseEvent {
    /// `2024-01-31 09:15:00: ADD CS101`
    pub fn display_line(&self) -> String {
        format!(
            "{}: {} {}",
            self.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            self.action.as_str().to_ascii_uppercase(),
            self.course_code
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseHistory {
    events: Vec<CourseEvent>,
}

impl CourseHistory {
    pub(crate) fn record(&mut self, event: CourseEvent) {
        self.events.push(event);
    }

    /// The most recent event, if any.
    pub fn head(&self) -> Option<&CourseEvent> {
        self.events.last()
    }

    /// Walk the chain from newest to oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CourseEvent> + ExactSizeIterator {
        self.events.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn history_lines(&self) -> Vec<String> {
        self.iter().map(CourseEvent::display_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 9, minute, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[test]
    fn history_walks_newest_first() {
        let mut history = CourseHistory::default();
        history.record(CourseEvent {
            course_code: "CS101".to_string(),
            action: CourseAction::Add,
            occurred_at: at(0),
        });
        history.record(CourseEvent {
            course_code: "CS101".to_string(),
            action: CourseAction::Remove,
            occurred_at: at(15),
        });

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.head().map(|event| event.action),
            Some(CourseAction::Remove)
        );
        assert_eq!(
            history.history_lines(),
            vec![
                "2024-01-31 09:15:00: REMOVE CS101".to_string(),
                "2024-01-31 09:00:00: ADD CS101".to_string(),
            ]
        );
    }

    #[test]
    fn history_serializes_as_plain_array() {
        let mut history = CourseHistory::default();
        history.record(CourseEvent {
            course_code: "IT345".to_string(),
            action: CourseAction::Add,
            occurred_at: at(5),
        });

        let value = serde_json::to_value(&history).expect("history should serialize");
        assert!(value.is_array());
        assert_eq!(value[0]["action"], "add");

        let parsed: CourseHistory =
            serde_json::from_value(value).expect("history should deserialize");
        assert_eq!(parsed, history);
    }
}
