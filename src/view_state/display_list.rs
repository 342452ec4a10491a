//! Flattening rows and group headers into the render-ready sequence.
//!
//! [`prep_display`] walks rows in store order. Before a row it emits every
//! header on the row's chain that is not open yet, outermost first. A
//! collapsed header marks its depth as suppressed: deeper headers and rows are
//! skipped until the walk rises back above that depth.
//!
//! Positions are recorded in side tables (`row_positions`, `header_positions`);
//! `None` means the item is hidden and must be skipped in lookups.

use super::types::DisplayItem;
use crate::grouping::GroupPartition;
use crate::model::{HeaderIndex, RowIndex};

/// Ordered display items plus the reverse position lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
    row_positions: Vec<Option<usize>>,
    header_positions: Vec<Option<usize>>,
}

impl DisplayList {
    /// Items in display order.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Number of visible items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `position`.
    pub fn get(&self, position: usize) -> Option<DisplayItem> {
        self.items.get(position).copied()
    }

    /// Display position of a row, `None` if hidden.
    pub fn row_position(&self, row: RowIndex) -> Option<usize> {
        self.row_positions.get(row.get()).copied().flatten()
    }

    /// Display position of a header, `None` if hidden.
    pub fn header_position(&self, header: HeaderIndex) -> Option<usize> {
        self.header_positions.get(header.get()).copied().flatten()
    }

    /// Display position of `item`, `None` if hidden.
    pub fn position_of(&self, item: DisplayItem) -> Option<usize> {
        match item {
            DisplayItem::Row(r) => self.row_position(r),
            DisplayItem::Header(h) => self.header_position(h),
        }
    }

    /// Visible rows in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = RowIndex> + '_ {
        self.items.iter().filter_map(DisplayItem::as_row)
    }
}

/// Build the display list for `row_count` rows grouped by `partition`.
///
/// Runs in O(n · depth).
pub fn prep_display(row_count: usize, partition: &GroupPartition) -> DisplayList {
    let header_count = partition.headers().len();
    let mut list = DisplayList {
        items: Vec::with_capacity(row_count + header_count),
        row_positions: vec![None; row_count],
        header_positions: vec![None; header_count],
    };

    // Headers on the current chain, outermost first.
    let mut open: Vec<HeaderIndex> = Vec::new();
    // Depth of the shallowest collapsed header on the chain.
    let mut suppressed_from: Option<usize> = None;

    for row in 0..row_count {
        let chain = partition
            .logical_group(RowIndex::new(row))
            .map(|g| partition.path(g))
            .unwrap_or_default();

        let shared = open
            .iter()
            .zip(&chain)
            .take_while(|(a, b)| a == b)
            .count();
        open.truncate(shared);
        if suppressed_from.is_some_and(|depth| depth >= shared) {
            suppressed_from = None;
        }

        for (depth, &header) in chain.iter().enumerate().skip(shared) {
            open.push(header);
            if suppressed_from.is_some() {
                continue;
            }
            if list.header_positions[header.get()].is_none() {
                list.header_positions[header.get()] = Some(list.items.len());
                list.items.push(DisplayItem::Header(header));
            }
            if partition.header(header).is_some_and(|h| h.collapsed) {
                suppressed_from = Some(depth);
            }
        }

        if suppressed_from.is_none() {
            list.row_positions[row] = Some(list.items.len());
            list.items.push(DisplayItem::Row(RowIndex::new(row)));
        }
    }

    list
}
