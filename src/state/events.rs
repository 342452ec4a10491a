//! Per-list observer channel.
//!
//! Each `ListContext` owns one [`EventChannel`]. Subscribers get an
//! `mpsc::Receiver` and drain it whenever they like; a dropped receiver is
//! forgotten on the next emit.

use crate::model::{HeaderIndex, PageDirection, PageRequest, RowId};
use crate::view_state::RenderedRange;
use std::sync::mpsc::{self, Receiver, Sender};

/// Something observable changed in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// Rows were loaded, replaced, inserted, updated or removed.
    RowsChanged {
        /// Rows in the store afterwards.
        row_count: usize,
    },
    /// A grouping pass ran or external headers were adopted.
    GroupingChanged {
        /// Number of headers produced.
        header_count: usize,
    },
    /// A header was collapsed or expanded.
    CollapseChanged {
        /// Header affected.
        header: HeaderIndex,
        /// New state.
        collapsed: bool,
    },
    /// The current row changed (empty id: no current row).
    CurrentRowChanged {
        /// New current row.
        row: RowId,
    },
    /// The scroll offset or rendered range moved.
    WindowChanged {
        /// Clamped scroll offset.
        scroll_offset: u64,
        /// Materialized positions.
        rendered: Option<RenderedRange>,
    },
    /// Total content height or maximum scroll changed.
    ScrollGeometryChanged {
        /// Sum of effective heights.
        total_height: u64,
        /// Largest valid offset for the current viewport.
        max_scroll: u64,
    },
    /// A page request went out.
    PageRequested(PageRequest),
    /// A page was merged into the cache.
    PageLoaded {
        /// Page that arrived.
        direction: PageDirection,
        /// Rows in the cache afterwards.
        row_count: usize,
    },
    /// The host reported a failed fetch.
    PageFailed {
        /// Page that failed.
        direction: PageDirection,
        /// Host-supplied reason.
        reason: String,
    },
    /// A persisted layout was applied.
    LayoutRestored,
}

/// Fan-out of [`ListEvent`]s to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventChannel {
    subscribers: Vec<Sender<ListEvent>>,
}

impl EventChannel {
    /// Channel with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// New subscription; receives every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<ListEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber.
    pub fn emit(&mut self, event: ListEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last emit.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
