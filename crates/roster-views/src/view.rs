//! Record views built on the sorts in [`crate::sort`].
//!
//! Every view borrows a materialised snapshot of records (see
//! `OrderedStore::snapshot`) and returns references into it in a new
//! order. The store itself is never touched.

use roster_store::{Record, StudyYear};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sort::{
    exchange_sort_by_key, merge_sort_by_key, partition_sort_by_key, selection_sort_desc_by_key,
};

/// Ascending study year; records within a year keep snapshot order.
pub fn by_study_year(records: &[Record]) -> Vec<&Record> {
    let refs: Vec<&Record> = records.iter().collect();
    exchange_sort_by_key(&refs, |record| record.study_year)
}

/// Most courses first. Order among equal course counts is unspecified.
pub fn by_course_load(records: &[Record]) -> Vec<&Record> {
    let refs: Vec<&Record> = records.iter().collect();
    selection_sort_desc_by_key(&refs, |record| record.course_count())
}

/// Ascending `(study year, lower-cased name)`.
pub fn by_year_then_name(records: &[Record]) -> Vec<&Record> {
    let refs: Vec<&Record> = records.iter().collect();
    partition_sort_by_key(&refs, |record| (record.study_year, record.name.to_lowercase()))
}

/// Records in `year`, ascending by `(course count, key)`.
///
/// A year nobody is in yields an empty view, not an error.
pub fn course_load_in_year(records: &[Record], year: StudyYear) -> Vec<&Record> {
    let refs: Vec<&Record> = records
        .iter()
        .filter(|record| record.study_year == year)
        .collect();
    if refs.is_empty() {
        debug!(study_year = %year, "no records in study year");
        return refs;
    }
    merge_sort_by_key(&refs, |record| (record.course_count(), record.key()))
}

/// A view chosen by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "study_year", rename_all = "snake_case")]
pub enum OrderingView {
    ByStudyYear,
    ByCourseLoad,
    ByYearThenName,
    CourseLoadInYear(StudyYear),
}

impl OrderingView {
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        match self {
            OrderingView::ByStudyYear => by_study_year(records),
            OrderingView::ByCourseLoad => by_course_load(records),
            OrderingView::ByYearThenName => by_year_then_name(records),
            OrderingView::CourseLoadInYear(year) => course_load_in_year(records, *year),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderingView::ByStudyYear => "by_study_year",
            OrderingView::ByCourseLoad => "by_course_load",
            OrderingView::ByYearThenName => "by_year_then_name",
            OrderingView::CourseLoadInYear(_) => "course_load_in_year",
        }
    }
}
