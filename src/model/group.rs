//! Grouping and sorting configuration plus group header records.

use super::identifiers::{ColumnId, HeaderIndex};
use serde::{Deserialize, Serialize};

/// One configured grouping level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLevel {
    /// Column whose values partition the rows at this level.
    pub column_id: ColumnId,
    /// Label shown for the level (e.g. in a grouping bar).
    #[serde(default)]
    pub label: String,
    /// Sort this level descending.
    #[serde(default)]
    pub reverse: bool,
}

impl GroupLevel {
    /// Ascending level labelled with its column id.
    pub fn new(column_id: ColumnId) -> Self {
        let label = column_id.as_str().to_string();
        Self {
            column_id,
            label,
            reverse: false,
        }
    }

    /// Same level, descending.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Active grouping: ordered levels, outermost first. Empty disables grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupConfig {
    levels: Vec<GroupLevel>,
}

impl GroupConfig {
    /// Grouping with the given levels.
    pub fn new(levels: Vec<GroupLevel>) -> Self {
        Self { levels }
    }

    /// Grouping disabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Configured levels, outermost first.
    pub fn levels(&self) -> &[GroupLevel] {
        &self.levels
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// True when grouping is disabled.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// True when `column_id` is one of the group keys.
    pub fn contains(&self, column_id: &ColumnId) -> bool {
        self.levels.iter().any(|l| &l.column_id == column_id)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// The list's active sort column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// Sorted column.
    pub column_id: ColumnId,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `column_id`.
    pub fn ascending(column_id: ColumnId) -> Self {
        Self {
            column_id,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on `column_id`.
    pub fn descending(column_id: ColumnId) -> Self {
        Self {
            column_id,
            direction: SortDirection::Descending,
        }
    }
}

/// A synthetic, collapsible partition boundary over rows sharing a key.
///
/// Wire headers use `-1` for "no parent"; see [`crate::model::page`] for the
/// conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    /// Configured level this header belongs to (0 = outermost).
    pub group_index: usize,
    /// Header one level up; `None` for top-level headers.
    pub parent: Option<HeaderIndex>,
    /// Display label of the group key.
    pub item: String,
    /// Rows under this header, at any depth.
    pub item_count: usize,
    /// Optional aggregate label.
    pub total: Option<String>,
    /// Whether descendants are hidden.
    pub collapsed: bool,
}
