//! Pixel geometry of the display list.
//!
//! Two layers:
//! - [`HeightCache`]: measured heights, keyed by row index and header index.
//!   Entries survive scrolling but are cleared on full reloads and regrouping.
//! - [`Geometry`]: the effective height of every display position, held in a
//!   [`HeightIndex`]. A measured height is used only for positions inside the
//!   trusted (rendered) range; everywhere else the running average stands in.
//!   `extra_height` of a row is always added on top.
//!
//! The maximum scroll offset is memoized and invalidated by any height change.

use super::height_index::HeightIndex;
use super::types::{DisplayItem, RenderedRange};
use crate::model::{HeaderIndex, Row, RowIndex};
use std::cell::Cell;

/// Measured heights (excluding `extra_height`), side tables per item kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeightCache {
    row_heights: Vec<Option<u32>>,
    header_heights: Vec<Option<u32>>,
}

impl HeightCache {
    /// Empty cache sized for `rows` rows and `headers` headers.
    pub fn new(rows: usize, headers: usize) -> Self {
        Self {
            row_heights: vec![None; rows],
            header_heights: vec![None; headers],
        }
    }

    /// Forget every measurement and resize.
    pub fn reset(&mut self, rows: usize, headers: usize) {
        self.row_heights.clear();
        self.row_heights.resize(rows, None);
        self.header_heights.clear();
        self.header_heights.resize(headers, None);
    }

    /// Measured height of `item`.
    pub fn measured(&self, item: DisplayItem) -> Option<u32> {
        match item {
            DisplayItem::Row(r) => self.row_heights.get(r.get()).copied().flatten(),
            DisplayItem::Header(h) => self.header_heights.get(h.get()).copied().flatten(),
        }
    }

    /// Record a measurement. Returns true if the stored value changed.
    pub fn record(&mut self, item: DisplayItem, height: u32) -> bool {
        let slot = match item {
            DisplayItem::Row(r) => self.row_heights.get_mut(r.get()),
            DisplayItem::Header(h) => self.header_heights.get_mut(h.get()),
        };
        match slot {
            Some(slot) if *slot != Some(height) => {
                *slot = Some(height);
                true
            }
            _ => false,
        }
    }

    /// Drop the measurement of one row.
    pub fn invalidate_row(&mut self, row: RowIndex) {
        if let Some(slot) = self.row_heights.get_mut(row.get()) {
            *slot = None;
        }
    }

    /// Drop the measurement of one header.
    pub fn invalidate_header(&mut self, header: HeaderIndex) {
        if let Some(slot) = self.header_heights.get_mut(header.get()) {
            *slot = None;
        }
    }

    /// Track a row inserted at `position`.
    pub fn insert_row(&mut self, position: usize) {
        let position = position.min(self.row_heights.len());
        self.row_heights.insert(position, None);
    }

    /// Track a row removed at `position`.
    pub fn remove_row(&mut self, position: usize) {
        if position < self.row_heights.len() {
            self.row_heights.remove(position);
        }
    }

    /// Track `count` rows added at the head; existing entries move with their rows.
    pub fn prepend_rows(&mut self, count: usize) {
        self.row_heights
            .splice(0..0, std::iter::repeat(None).take(count));
    }

    /// Track `count` rows added at the tail.
    pub fn append_rows(&mut self, count: usize) {
        let len = self.row_heights.len();
        self.row_heights.resize(len + count, None);
    }

    /// Mean of every known measurement, rounded to the nearest pixel.
    pub fn average(&self) -> Option<u32> {
        let (sum, count) = self
            .row_heights
            .iter()
            .chain(&self.header_heights)
            .flatten()
            .fold((0u64, 0u64), |(s, c), h| (s + u64::from(*h), c + 1));
        (count > 0).then(|| ((sum + count / 2) / count) as u32)
    }
}

/// Inputs needed to derive the effective height of a display position.
#[derive(Debug, Clone, Copy)]
pub struct ItemMetrics<'a> {
    /// Display list items.
    pub items: &'a [DisplayItem],
    /// Measured heights.
    pub measured: &'a HeightCache,
    /// Rows in store order, for `extra_height`.
    pub rows: &'a [Row],
}

impl ItemMetrics<'_> {
    fn effective(&self, position: usize, average: u32, trusted: bool) -> u32 {
        let Some(&item) = self.items.get(position) else {
            return 0;
        };
        let base = if trusted {
            self.measured.measured(item).unwrap_or(average)
        } else {
            average
        };
        let extra = match item {
            DisplayItem::Row(r) => self.rows.get(r.get()).map_or(0, Row::extra_height_px),
            DisplayItem::Header(_) => 0,
        };
        base.saturating_add(extra)
    }
}

/// Effective heights of every display position.
#[derive(Debug, Clone)]
pub struct Geometry {
    index: HeightIndex,
    average: u32,
    trusted: Option<RenderedRange>,
    /// `(viewport, max_scroll)` of the last query.
    max_scroll: Cell<Option<(u64, u64)>>,
}

impl Geometry {
    /// Empty geometry with `average` as the initial fallback height.
    pub fn new(average: u32) -> Self {
        Self {
            index: HeightIndex::new(),
            average,
            trusted: None,
            max_scroll: Cell::new(None),
        }
    }

    /// Current fallback height.
    pub fn average(&self) -> u32 {
        self.average
    }

    /// Range whose measurements are in use.
    pub fn trusted(&self) -> Option<RenderedRange> {
        self.trusted
    }

    /// Recompute every position.
    pub fn rebuild(&mut self, metrics: &ItemMetrics<'_>, average: u32, trusted: Option<RenderedRange>) {
        self.average = average;
        self.trusted = trusted;
        let heights = (0..metrics.items.len())
            .map(|p| metrics.effective(p, average, trusted.is_some_and(|t| t.contains(p))));
        self.index.rebuild(heights);
        self.max_scroll.set(None);
    }

    /// Move the trusted range, updating only the positions that enter or leave
    /// it plus those inside it. Returns true if any height changed.
    pub fn retrust(&mut self, metrics: &ItemMetrics<'_>, trusted: Option<RenderedRange>) -> bool {
        let previous = std::mem::replace(&mut self.trusted, trusted);
        let touched = previous
            .into_iter()
            .chain(trusted)
            .flat_map(|r| r.positions());
        let mut changed = false;
        for position in touched {
            let trust = trusted.is_some_and(|t| t.contains(position));
            changed |= self
                .index
                .set(position, metrics.effective(position, self.average, trust));
        }
        if changed {
            self.max_scroll.set(None);
        }
        changed
    }

    /// Re-derive the height of one position (e.g. after an `extra_height` change).
    pub fn refresh(&mut self, metrics: &ItemMetrics<'_>, position: usize) -> bool {
        let trust = self.trusted.is_some_and(|t| t.contains(position));
        let changed = self
            .index
            .set(position, metrics.effective(position, self.average, trust));
        if changed {
            self.max_scroll.set(None);
        }
        changed
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when there are no positions.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Effective height of `position`.
    pub fn height(&self, position: usize) -> u32 {
        self.index.height(position)
    }

    /// Offset at which `position` starts.
    pub fn top(&self, position: usize) -> u64 {
        self.index.top(position)
    }

    /// Offset at which `position` ends.
    pub fn bottom(&self, position: usize) -> u64 {
        self.index.bottom(position)
    }

    /// Sum of all heights.
    pub fn total(&self) -> u64 {
        self.index.total()
    }

    /// First position whose bottom lies strictly past `offset`.
    pub fn item_at(&self, offset: u64) -> Option<usize> {
        self.index.item_at(offset)
    }

    /// Largest valid scroll offset for a viewport of `viewport` pixels.
    pub fn max_scroll(&self, viewport: u64) -> u64 {
        if let Some((cached_viewport, value)) = self.max_scroll.get() {
            if cached_viewport == viewport {
                return value;
            }
        }
        let value = self.total().saturating_sub(viewport);
        self.max_scroll.set(Some((viewport, value)));
        value
    }
}
