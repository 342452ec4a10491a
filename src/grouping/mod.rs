//! Sorting and partitioning rows into group headers.

pub mod comparator;
pub mod engine;

pub use comparator::{compare_values, KeyComparator, SortPlan};
pub use engine::{group_data, validate_headers, GroupPartition, GroupingOptions};
