//! Store holding a window of a larger server-side set.
//!
//! Merge rules per page direction:
//! - `Next` appends new rows after the tail; `last_loaded` follows the response
//! - `Prev` arrives nearest-first, so the rows are reversed and then prepended;
//!   `first_loaded` follows the response
//! - `First` / `Last` replace the cache and take both flags from the response
//!
//! Known ids are overwritten in place, so merging the same page twice leaves
//! the row count unchanged.

use super::{CacheBounds, PageMerge, RowCache, RowStore};
use crate::config::PagingMode;
use crate::model::{ListError, PageDirection, Row};
use tracing::debug;

/// Windowed row cache plus head/tail flags.
#[derive(Debug, Clone)]
pub struct PagedCacheStore {
    cache: RowCache,
    bounds: CacheBounds,
}

impl PagedCacheStore {
    /// Empty store with unknown bounds.
    pub fn new() -> Self {
        Self {
            cache: RowCache::default(),
            bounds: CacheBounds::unknown(),
        }
    }
}

impl Default for PagedCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStore for PagedCacheStore {
    fn mode(&self) -> PagingMode {
        PagingMode::Paged
    }

    fn cache(&self) -> &RowCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut RowCache {
        &mut self.cache
    }

    fn bounds(&self) -> CacheBounds {
        self.bounds
    }

    fn merge_page(
        &mut self,
        direction: PageDirection,
        rows: Vec<Row>,
        is_first: bool,
        is_last: bool,
    ) -> Result<PageMerge, ListError> {
        let merge = match direction {
            PageDirection::Next => {
                let (appended, updated) = self.cache.append_unique(rows);
                self.bounds.last_loaded = is_last;
                PageMerge {
                    direction,
                    prepended: 0,
                    appended,
                    updated,
                    replaced: false,
                }
            }
            PageDirection::Prev => {
                let mut rows = rows;
                rows.reverse();
                let (prepended, updated) = self.cache.prepend_unique(rows);
                self.bounds.first_loaded = is_first;
                PageMerge {
                    direction,
                    prepended,
                    appended: 0,
                    updated,
                    replaced: false,
                }
            }
            PageDirection::First | PageDirection::Last => {
                let count = rows.len();
                self.cache = RowCache::from_rows(rows)?;
                self.bounds = CacheBounds {
                    first_loaded: is_first,
                    last_loaded: is_last,
                };
                PageMerge {
                    direction,
                    prepended: 0,
                    appended: count,
                    updated: 0,
                    replaced: true,
                }
            }
        };
        debug!(
            %direction,
            prepended = merge.prepended,
            appended = merge.appended,
            updated = merge.updated,
            cached = self.cache.len(),
            "merged page"
        );
        Ok(merge)
    }

    fn clear(&mut self) {
        self.cache = RowCache::default();
        self.bounds = CacheBounds::unknown();
    }
}
