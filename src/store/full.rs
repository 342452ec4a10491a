//! Store holding the complete data set.

use super::{CacheBounds, PageMerge, RowCache, RowStore};
use crate::config::PagingMode;
use crate::model::{ListError, PageDirection, Row, UnsupportedConfig};

/// Every row of the list is cached; both bounds are always loaded.
#[derive(Debug, Clone, Default)]
pub struct FullCacheStore {
    cache: RowCache,
}

impl FullCacheStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for FullCacheStore {
    fn mode(&self) -> PagingMode {
        PagingMode::Full
    }

    fn cache(&self) -> &RowCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut RowCache {
        &mut self.cache
    }

    fn bounds(&self) -> CacheBounds {
        CacheBounds::complete()
    }

    fn merge_page(
        &mut self,
        _direction: PageDirection,
        _rows: Vec<Row>,
        _is_first: bool,
        _is_last: bool,
    ) -> Result<PageMerge, ListError> {
        Err(UnsupportedConfig::PagingDisabled.into())
    }

    fn clear(&mut self) {
        self.cache = RowCache::default();
    }
}
