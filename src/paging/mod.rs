//! Paging cache controller and the page source seam.
//!
//! The controller decides when the rendered range is close enough to a cache
//! edge to ask for an adjacent page, and guarantees at most one request is in
//! flight. Fetching is the host's business: requests go out through
//! [`PageSource`] and come back via `ListContext::on_page_loaded`.

pub mod controller;

pub use controller::{PagingController, PagingState};

use crate::model::PageRequest;
use std::cell::RefCell;
use std::rc::Rc;

/// Remote page-fetch channel.
///
/// Each request must be resolved exactly once, successfully or not, by
/// calling `ListContext::on_page_loaded` with the request id.
pub trait PageSource {
    /// Start fetching `request`.
    fn fetch_page(&mut self, request: &PageRequest);
}

/// Page source that queues requests for the host to service later.
///
/// Clones share one queue: hand one to the list and keep one to drain.
#[derive(Debug, Clone, Default)]
pub struct QueuedPageSource {
    requests: Rc<RefCell<Vec<PageRequest>>>,
}

impl QueuedPageSource {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests not yet taken.
    pub fn pending(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Take every queued request, oldest first.
    pub fn drain(&self) -> Vec<PageRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

impl PageSource for QueuedPageSource {
    fn fetch_page(&mut self, request: &PageRequest) {
        self.requests.borrow_mut().push(request.clone());
    }
}
