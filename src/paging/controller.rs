//! Idle → Loading → Idle state machine for page requests.

use crate::model::{PageDirection, PageRequest, RequestId, RowId};
use crate::store::CacheBounds;
use tracing::{debug, info};

/// Whether a page request is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PagingState {
    /// No request in flight.
    #[default]
    Idle,
    /// Waiting for the host to resolve `0`.
    Loading(PageRequest),
}

/// Prefetch policy plus the single in-flight guard.
#[derive(Debug, Clone)]
pub struct PagingController {
    prefetch_margin: usize,
    page_size: usize,
    state: PagingState,
    next_id: u64,
}

impl PagingController {
    /// Controller prefetching when the rendered range comes within
    /// `prefetch_margin` rows of a cache edge.
    pub fn new(prefetch_margin: usize, page_size: usize) -> Self {
        Self {
            prefetch_margin,
            page_size,
            state: PagingState::Idle,
            next_id: 1,
        }
    }

    /// Current state.
    pub fn state(&self) -> &PagingState {
        &self.state
    }

    /// True while a request is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, PagingState::Loading(_))
    }

    /// Prefetch margin in rows.
    pub fn prefetch_margin(&self) -> usize {
        self.prefetch_margin
    }

    /// Decide whether the rendered rows call for an adjacent page.
    ///
    /// `first_row`/`last_row` are store positions of the first and last
    /// rendered rows. A next page is preferred over a previous one.
    pub fn trigger_cache_update(
        &mut self,
        first_row: usize,
        last_row: usize,
        cache_len: usize,
        bounds: CacheBounds,
        head: Option<&RowId>,
        tail: Option<&RowId>,
    ) -> Option<PageRequest> {
        if !bounds.last_loaded && last_row.saturating_add(self.prefetch_margin) >= cache_len {
            return self.load_cache_page(PageDirection::Next, tail.cloned());
        }
        if !bounds.first_loaded && first_row < self.prefetch_margin {
            return self.load_cache_page(PageDirection::Prev, head.cloned());
        }
        None
    }

    /// Issue a request for `direction` unless one is already in flight.
    ///
    /// Returns `None` when the request was dropped by the guard.
    pub fn load_cache_page(
        &mut self,
        direction: PageDirection,
        anchor: Option<RowId>,
    ) -> Option<PageRequest> {
        if let PagingState::Loading(pending) = &self.state {
            debug!(
                %direction,
                pending = %pending.direction,
                "page request dropped, one is already in flight"
            );
            return None;
        }
        let request = PageRequest {
            id: RequestId::new(self.next_id),
            direction,
            anchor,
            page_size: self.page_size,
        };
        self.next_id += 1;
        info!(id = request.id.get(), %direction, "requesting page");
        self.state = PagingState::Loading(request.clone());
        Some(request)
    }

    /// Resolve the in-flight request.
    ///
    /// Returns the completed request, or `None` for a stale id, which leaves
    /// the state untouched.
    pub fn complete(&mut self, id: RequestId) -> Option<PageRequest> {
        if !matches!(&self.state, PagingState::Loading(pending) if pending.id == id) {
            debug!(id = id.get(), "ignoring completion of unknown page request");
            return None;
        }
        match std::mem::take(&mut self.state) {
            PagingState::Loading(request) => Some(request),
            PagingState::Idle => None,
        }
    }

    /// Drop any in-flight request (e.g. the cache was reset).
    pub fn reset(&mut self) {
        self.state = PagingState::Idle;
    }
}
