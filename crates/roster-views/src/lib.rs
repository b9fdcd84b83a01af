//! # roster-views
//!
//! Ordered views over a record snapshot. Each view uses a different sort:
//!
//! - `by_study_year`: exchange sort, stable
//! - `by_course_load`: selection sort, descending, unstable
//! - `by_year_then_name`: three-way partition sort
//! - `course_load_in_year`: merge sort over one study year
//!
//! The sorts in [`sort`] are generic over any `Clone` item and key
//! extractor; views instantiate them with `&Record`.

pub mod sort;
pub mod view;

pub use sort::{
    exchange_sort_by_key, merge_sort_by_key, partition_sort_by_key, selection_sort_desc_by_key,
};
pub use view::{
    OrderingView, by_course_load, by_study_year, by_year_then_name, course_load_in_year,
};
