//! Core identifier newtypes with smart constructors.
//!
//! `RowId` is the one identifier allowed to be empty: the empty string is
//! reserved for a row that has not been saved on the server yet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a row within a row store.
///
/// Unique among saved rows. The empty id denotes the unsaved (new) row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Wrap a server-assigned id. An empty string yields the unsaved id.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The reserved id of a row not yet saved on the server.
    pub fn unsaved() -> Self {
        Self(String::new())
    }

    /// True for the reserved unsaved id.
    pub fn is_unsaved(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Column identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnId(String);

impl ColumnId {
    /// Smart constructor: validates non-empty column id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidColumnId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidColumnId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ColumnId {
    type Error = InvalidColumnId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ColumnId> for String {
    fn from(id: ColumnId) -> Self {
        id.0
    }
}

/// Position of a row in the row store. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowIndex(usize);

impl RowIndex {
    /// Create a new RowIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Position of a header in the grouping engine's header list. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderIndex(usize);

impl HeaderIndex {
    /// Create a new HeaderIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }
}

// ===== Error Types =====

/// Rejected column id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidColumnId {
    /// Column ids must not be empty.
    #[error("Column ID cannot be empty")]
    Empty,
}

// ===== Tests =====
