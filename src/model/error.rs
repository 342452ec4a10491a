//! Error types for the list engine.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`ListError`] - Top-level error returned by `ListContext` operations
//!   - [`ValidationError`] - A collaborator violated its contract (malformed page response,
//!     recursive or dangling group headers, duplicate row ids)
//!   - [`UnsupportedConfig`] - A configuration the engine refuses at the time it is applied
//!
//! # Recovery Strategy
//!
//! Validation errors are **fatal to the operation**: the list state is left as it was before
//! the call and the error is surfaced to the host. Continuing would render an inconsistent list.
//!
//! Storage errors (see [`crate::storage::StorageError`]) are not part of this hierarchy: they
//! are recovered inside the storage layer by falling back to defaults.
//!
//! Page fetch failures reported by the host ([`PageFetchError`]) are logged and the paging
//! controller returns to idle; the next render-range update re-evaluates.

use super::identifiers::{ColumnId, RowId};
use super::page::PageDirection;
use thiserror::Error;

/// Top-level error encompassing all failure modes of list operations.
///
/// # Examples
///
/// ```
/// use vlist::model::error::{ListError, ValidationError};
///
/// fn check() -> Result<(), ValidationError> {
///     Err(ValidationError::HeaderSelfParent { header: 3 })
/// }
///
/// fn apply() -> Result<(), ListError> {
///     // ValidationError converts to ListError via From
///     check()?;
///     Ok(())
/// }
/// assert!(apply().unwrap_err().to_string().contains("header 3"));
/// ```
#[derive(Debug, Error)]
pub enum ListError {
    /// A collaborator supplied structurally invalid data.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The requested configuration is not supported in the current mode.
    #[error("Unsupported configuration: {0}")]
    Unsupported(#[from] UnsupportedConfig),
}

/// Contract violations by a collaborator.
///
/// Every variant carries enough context (indices, ids, field names) to locate the
/// offending record in the response or header list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A page response field that must be a list was something else.
    #[error("Page response field '{field}' must be a list")]
    NotAList {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A page response was not a JSON object.
    #[error("Page response must be an object")]
    NotAnObject,

    /// A required page response field was absent.
    #[error("Page response is missing required field '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A page response had the right shape but bad contents.
    #[error("Malformed page response: {message}")]
    MalformedResponse {
        /// Deserializer message.
        message: String,
    },

    /// A group header names itself as its parent.
    #[error("Group header {header} references itself as parent")]
    HeaderSelfParent {
        /// Offending header.
        header: usize,
    },

    /// A group header's parent index is out of range.
    #[error("Group header {header} references missing parent {parent}")]
    DanglingParent {
        /// Offending header.
        header: usize,
        /// Referenced parent.
        parent: i64,
    },

    /// Following parents from a header never reaches a top-level header.
    #[error("Group header {header} is part of a parent cycle")]
    HeaderCycle {
        /// A header on the cycle.
        header: usize,
    },

    /// A header's parent is not exactly one level shallower.
    #[error("Group header {header} at level {level} has parent at level {parent_level}")]
    ParentLevelMismatch {
        /// Offending header.
        header: usize,
        /// Level of the header.
        level: usize,
        /// Level of its parent.
        parent_level: usize,
    },

    /// A header's group level has no matching configuration entry.
    #[error("Group header {header} uses level {group_index} but only {levels} levels are configured")]
    UnknownGroupLevel {
        /// Offending header.
        header: usize,
        /// Level named by the header.
        group_index: usize,
        /// Number of configured levels.
        levels: usize,
    },

    /// A row points at a header that does not exist.
    #[error("Row {row} references missing group header {header}")]
    DanglingRowHeader {
        /// Offending row position.
        row: usize,
        /// Referenced header.
        header: i64,
    },

    /// A row was inserted under an id the store already holds.
    #[error("Row id '{id}' already exists")]
    DuplicateRowId {
        /// Duplicated id.
        id: RowId,
    },

    /// An operation referenced a row id the store does not hold.
    #[error("Row id '{id}' not found")]
    UnknownRow {
        /// Missing id.
        id: RowId,
    },

    /// An incremental page carried group headers, which only full replacements may do.
    #[error("A '{direction}' page must not carry group headers")]
    UnexpectedGroupHeaders {
        /// Direction of the offending page.
        direction: PageDirection,
    },
}

/// Configurations rejected when applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedConfig {
    /// Client-side grouping needs every row; a paged cache only holds a window.
    #[error("Client-side grouping is not available while rows are loaded page by page")]
    GroupingWhilePaged,

    /// A configuration references a column the list does not have.
    #[error("Unknown column '{column}'")]
    UnknownColumn {
        /// Referenced column.
        column: ColumnId,
    },

    /// Grouping was requested on a column flagged as not groupable.
    #[error("Column '{column}' is not groupable")]
    NotGroupable {
        /// Referenced column.
        column: ColumnId,
    },

    /// A page operation was attempted on a list that holds its full data set.
    #[error("Paging operations require a paged row store")]
    PagingDisabled,
}

/// Transport failure reported by the host for a page request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Page fetch failed: {reason}")]
pub struct PageFetchError {
    /// Host-supplied description.
    pub reason: String,
}

impl PageFetchError {
    /// Failure with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
