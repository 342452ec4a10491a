//! Row stores: the client-side cache of row records.
//!
//! One [`RowStore`] interface, two implementations selected by
//! [`PagingMode`]:
//! - [`FullCacheStore`] holds the complete data set
//! - [`PagedCacheStore`] holds a window of a larger server-side set and merges
//!   fetched pages into it
//!
//! Stores only know about rows. Group membership, heights and display
//! positions are side tables owned by `ListContext`, which keeps them aligned
//! with every mutation reported here.

pub mod cache;
pub mod full;
pub mod paged;

pub use cache::RowCache;
pub use full::FullCacheStore;
pub use paged::PagedCacheStore;

use crate::config::PagingMode;
use crate::grouping::compare_values;
use crate::model::{
    DataType, ListError, PageDirection, Row, RowId, RowIndex, ValidationError,
};
use std::cmp::Ordering;
use std::fmt;

/// Whether the cache reaches the head and tail of the server-side set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBounds {
    /// The first server page is cached.
    pub first_loaded: bool,
    /// The last server page is cached.
    pub last_loaded: bool,
}

impl CacheBounds {
    /// Both ends present (a full data set).
    pub fn complete() -> Self {
        Self {
            first_loaded: true,
            last_loaded: true,
        }
    }

    /// Neither end known yet.
    pub fn unknown() -> Self {
        Self {
            first_loaded: false,
            last_loaded: false,
        }
    }
}

/// What a page merge did to the row positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMerge {
    /// Page that was merged.
    pub direction: PageDirection,
    /// New rows inserted at the head; every existing position shifts by this.
    pub prepended: usize,
    /// New rows added at the tail.
    pub appended: usize,
    /// Rows already cached that were overwritten in place.
    pub updated: usize,
    /// The whole cache was replaced.
    pub replaced: bool,
}

/// Ordered collection of cached rows.
pub trait RowStore: fmt::Debug {
    /// Which implementation this is.
    fn mode(&self) -> PagingMode;

    /// Backing cache.
    fn cache(&self) -> &RowCache;

    /// Backing cache, mutable.
    fn cache_mut(&mut self) -> &mut RowCache;

    /// Head/tail coverage of the server-side set.
    fn bounds(&self) -> CacheBounds;

    /// Merge a fetched page.
    ///
    /// # Errors
    ///
    /// [`crate::model::UnsupportedConfig::PagingDisabled`] for a full store.
    fn merge_page(
        &mut self,
        direction: PageDirection,
        rows: Vec<Row>,
        is_first: bool,
        is_last: bool,
    ) -> Result<PageMerge, ListError>;

    /// Drop every row and forget both bounds.
    fn clear(&mut self);

    /// Rows in store order.
    fn rows(&self) -> &[Row] {
        self.cache().rows()
    }

    /// Number of cached rows.
    fn len(&self) -> usize {
        self.cache().len()
    }

    /// True when no rows are cached.
    fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    /// Row at `index`.
    fn row(&self, index: RowIndex) -> Option<&Row> {
        self.cache().rows().get(index.get())
    }

    /// Position of `id`.
    fn index_of(&self, id: &RowId) -> Option<RowIndex> {
        self.cache().position(id).map(RowIndex::new)
    }

    /// Replace every row.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateRowId`]; the store is unchanged on error.
    fn replace_all(&mut self, rows: Vec<Row>) -> Result<(), ValidationError> {
        *self.cache_mut() = RowCache::from_rows(rows)?;
        Ok(())
    }

    /// Move the rows out for reordering.
    fn take_rows(&mut self) -> Vec<Row> {
        self.cache_mut().take()
    }

    /// Put reordered rows back.
    fn restore_rows(&mut self, rows: Vec<Row>) {
        self.cache_mut().restore(rows);
    }

    /// Insert `row` at `position` (clamped to the end).
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateRowId`].
    fn insert(&mut self, position: usize, row: Row) -> Result<RowIndex, ValidationError> {
        self.cache_mut().insert(position, row).map(RowIndex::new)
    }

    /// Overwrite the row currently identified by `id`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`] or [`ValidationError::DuplicateRowId`].
    fn update(&mut self, id: &RowId, row: Row) -> Result<RowIndex, ValidationError> {
        let position = self
            .cache()
            .position(id)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        self.cache_mut().replace(position, row)?;
        Ok(RowIndex::new(position))
    }

    /// Remove the row identified by `id`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`].
    fn remove(&mut self, id: &RowId) -> Result<(RowIndex, Row), ValidationError> {
        let position = self
            .cache()
            .position(id)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        let row = self
            .cache_mut()
            .remove(position)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        Ok((RowIndex::new(position), row))
    }

    /// Binary search a column the rows are sorted on (ascending).
    ///
    /// Returns the earliest row whose value equals `needle` under the column's
    /// comparator.
    fn search(&self, column: usize, data_type: DataType, needle: &str) -> Option<RowIndex> {
        let rows = self.rows();
        let first = rows.partition_point(|r| {
            compare_values(data_type, r.value(column), needle) == Ordering::Less
        });
        rows.get(first)
            .filter(|r| compare_values(data_type, r.value(column), needle) == Ordering::Equal)
            .map(|_| RowIndex::new(first))
    }
}

/// Store for `mode`.
pub fn store_for(mode: PagingMode) -> Box<dyn RowStore> {
    match mode {
        PagingMode::Full => Box::new(FullCacheStore::new()),
        PagingMode::Paged => Box::new(PagedCacheStore::new()),
    }
}
