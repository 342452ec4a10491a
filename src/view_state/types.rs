//! Core view-state types

use crate::model::{HeaderIndex, RowIndex};

/// One unit of the flattened, render-ready sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayItem {
    /// A row of the store.
    Row(RowIndex),
    /// A group header.
    Header(HeaderIndex),
}

impl DisplayItem {
    /// Row index, if this is a row.
    pub fn as_row(&self) -> Option<RowIndex> {
        match self {
            Self::Row(r) => Some(*r),
            Self::Header(_) => None,
        }
    }

    /// Header index, if this is a header.
    pub fn as_header(&self) -> Option<HeaderIndex> {
        match self {
            Self::Header(h) => Some(*h),
            Self::Row(_) => None,
        }
    }
}

/// Inclusive range of display positions.
///
/// # Invariants
/// - `first <= last`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedRange {
    first: usize,
    last: usize,
}

impl RenderedRange {
    /// Range `[first, last]`. The bounds are swapped if given in reverse.
    pub fn new(first: usize, last: usize) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// First position (inclusive).
    pub fn first(&self) -> usize {
        self.first
    }

    /// Last position (inclusive).
    pub fn last(&self) -> usize {
        self.last
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false; a range holds at least one position.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if `position` lies inside the range.
    pub fn contains(&self, position: usize) -> bool {
        (self.first..=self.last).contains(&position)
    }

    /// True if `other` lies entirely inside this range.
    pub fn covers(&self, other: &RenderedRange) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    /// Positions in order.
    pub fn positions(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }

    /// Grown by `margin` on both sides, clamped to `[0, count - 1]`.
    pub fn expanded(&self, margin: usize, count: usize) -> Self {
        let max = count.saturating_sub(1);
        Self {
            first: self.first.saturating_sub(margin).min(max),
            last: self.last.saturating_add(margin).min(max),
        }
    }

    /// Moved `by` positions toward the tail.
    pub fn shifted(&self, by: usize) -> Self {
        Self {
            first: self.first + by,
            last: self.last + by,
        }
    }
}
