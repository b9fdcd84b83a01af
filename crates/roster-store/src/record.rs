//! Record type: one student, keyed by an immutable integer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::ContentHash;
use crate::error::StoreError;
use crate::history::{CourseAction, CourseEvent, CourseHistory};

/// The sole ordering field of the store.
pub type RecordKey = i64;

/// Study-year classification. The core stores whatever it is given.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StudyYear(pub u8);

impl fmt::Display for StudyYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A student record.
///
/// The key is fixed at construction. The course set keeps insertion order
/// and never holds the same code twice; every mutation through
/// [`Record::add_course`] / [`Record::remove_course`] prepends an event to
/// the record's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    key: RecordKey,

    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    courses: Vec<String>,

    #[serde(default)]
    pub study_year: StudyYear,
    #[serde(default)]
    pub full_time: bool,

    #[serde(default, skip_serializing_if = "CourseHistory::is_empty")]
    history: CourseHistory,
}

impl Record {
    pub fn new(
        key: RecordKey,
        name: impl Into<String>,
        contact: impl Into<String>,
        study_year: StudyYear,
        full_time: bool,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            contact: contact.into(),
            courses: Vec::new(),
            study_year,
            full_time,
            history: CourseHistory::default(),
        }
    }

    /// Seed the initial course set without recording history.
    ///
    /// Repeated codes are dropped after their first occurrence.
    pub fn with_courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for course in courses {
            let course = course.into();
            if !self.courses.contains(&course) {
                self.courses.push(course);
            }
        }
        self
    }

    /// Rewrite every course code through `f` without recording history.
    ///
    /// Codes that map onto one already kept are dropped. On error the
    /// course list is left untouched.
    pub fn map_courses<E>(&mut self, mut f: impl FnMut(&str) -> Result<String, E>) -> Result<(), E> {
        let mut mapped: Vec<String> = Vec::with_capacity(self.courses.len());
        for course in &self.courses {
            let code = f(course)?;
            if !mapped.contains(&code) {
                mapped.push(code);
            }
        }
        self.courses = mapped;
        Ok(())
    }

    pub fn key(&self) -> RecordKey {
        self.key
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn has_course(&self, course: &str) -> bool {
        self.courses.iter().any(|c| c == course)
    }

    pub fn history(&self) -> &CourseHistory {
        &self.history
    }

    pub fn add_course(&mut self, course: impl Into<String>) -> Result<(), StoreError> {
        self.add_course_at(course, Utc::now())
    }

    /// Add a course, stamping the history event with `at`.
    pub fn add_course_at(
        &mut self,
        course: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let course = course.into();
        if self.has_course(&course) {
            return Err(StoreError::DuplicateCourse {
                key: self.key,
                course,
            });
        }
        self.courses.push(course.clone());
        self.history.record(CourseEvent {
            course_code: course,
            action: CourseAction::Add,
            occurred_at: at,
        });
        Ok(())
    }

    pub fn remove_course(&mut self, course: &str) -> Result<(), StoreError> {
        self.remove_course_at(course, Utc::now())
    }

    /// Remove a course, stamping the history event with `at`.
    pub fn remove_course_at(&mut self, course: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let Some(position) = self.courses.iter().position(|c| c == course) else {
            return Err(StoreError::CourseNotFound {
                key: self.key,
                course: course.to_string(),
            });
        };
        let course = self.courses.remove(position);
        self.history.record(CourseEvent {
            course_code: course,
            action: CourseAction::Remove,
            occurred_at: at,
        });
        Ok(())
    }

    /// Hash of every persisted attribute, history included.
    pub fn content_hash(&self) -> ContentHash {
        let mut builder = ContentHash::builder()
            .field_int("key", self.key)
            .field("name", &self.name)
            .field("contact", &self.contact)
            .field_int("study_year", i64::from(self.study_year.0))
            .field_bool("full_time", self.full_time);

        for course in &self.courses {
            builder = builder.field("course", course);
        }
        for event in self.history.iter().rev() {
            builder = builder
                .field("event_course", &event.course_code)
                .field("event_action", event.action.as_str())
                .field("event_at", &event.occurred_at.to_rfc3339());
        }

        builder.finish()
    }
}
