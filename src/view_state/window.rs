//! Window manager: which display positions are materialized.
//!
//! [`WindowManager::update_position`] clamps the scroll offset, finds the
//! visible positions, widens them by the over-render margin and then either
//! adjusts the previously rendered range at its edges or rebuilds it.
//!
//! The incremental path is taken when the new visible range lies inside the
//! previous rendered range grown by the margin. Both paths end at the same
//! rendered range; they differ only in the operations handed to the host.
//!
//! Zebra striping follows display parity: an item at an odd position is odd,
//! so the flag flips with every single-item insertion or removal at an edge.

use super::geometry::Geometry;
use super::types::RenderedRange;
use tracing::debug;

/// Inputs of one positioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    /// Requested scroll offset in pixels (clamped to the valid range).
    pub scroll_offset: u64,
    /// Viewport height in pixels.
    pub viewport: u64,
    /// Discard the rendered range even if an incremental update would do.
    pub force_rebuild: bool,
    /// Snap the offset to the nearest item boundary.
    pub snap: bool,
}

/// One change to the materialized items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    /// Discard everything and materialize `range`.
    Rebuild {
        /// New rendered range.
        range: RenderedRange,
    },
    /// Discard everything; nothing is rendered.
    Clear,
    /// Insert the item at `position` before the current first item.
    Prepend {
        /// Display position.
        position: usize,
        /// Zebra flag.
        odd: bool,
    },
    /// Insert the item at `position` after the current last item.
    Append {
        /// Display position.
        position: usize,
        /// Zebra flag.
        odd: bool,
    },
    /// Remove the current first item.
    RemoveFirst {
        /// Display position being removed.
        position: usize,
    },
    /// Remove the current last item.
    RemoveLast {
        /// Display position being removed.
        position: usize,
    },
}

/// Result of a positioning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowUpdate {
    /// Scroll offset after clamping and snapping.
    pub scroll_offset: u64,
    /// Positions intersecting the viewport.
    pub visible: Option<RenderedRange>,
    /// Positions materialized after the pass.
    pub rendered: Option<RenderedRange>,
    /// Operations to apply, in order.
    pub ops: Vec<WindowOp>,
    /// True if the pass discarded the previous range.
    pub rebuilt: bool,
}

/// Scroll position plus rendered range of one list.
#[derive(Debug, Clone)]
pub struct WindowManager {
    margin: usize,
    scroll_offset: u64,
    viewport: u64,
    visible: Option<RenderedRange>,
    rendered: Option<RenderedRange>,
}

impl WindowManager {
    /// Manager rendering `margin` extra items beyond each viewport edge.
    pub fn new(margin: usize) -> Self {
        Self {
            margin,
            scroll_offset: 0,
            viewport: 0,
            visible: None,
            rendered: None,
        }
    }

    /// Over-render margin.
    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Current (clamped) scroll offset.
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Current viewport height.
    pub fn viewport(&self) -> u64 {
        self.viewport
    }

    /// Positions intersecting the viewport after the last pass.
    pub fn visible(&self) -> Option<RenderedRange> {
        self.visible
    }

    /// Materialized positions.
    pub fn rendered(&self) -> Option<RenderedRange> {
        self.rendered
    }

    /// Move the rendered range and offset after `by` items were inserted in
    /// front of it, so the same items stay materialized at the same place on
    /// screen.
    pub fn shift(&mut self, by: usize, offset_delta: u64) {
        self.rendered = self.rendered.map(|r| r.shifted(by));
        self.visible = self.visible.map(|r| r.shifted(by));
        self.scroll_offset = self.scroll_offset.saturating_add(offset_delta);
    }

    /// Forget the rendered range; the next pass rebuilds.
    pub fn invalidate(&mut self) {
        self.rendered = None;
        self.visible = None;
    }

    /// Position the window over `geometry`.
    pub fn update_position(&mut self, geometry: &Geometry, request: PositionRequest) -> WindowUpdate {
        let count = geometry.len();
        let max_scroll = geometry.max_scroll(request.viewport);
        let mut offset = request.scroll_offset.min(max_scroll);
        self.viewport = request.viewport;

        if count == 0 {
            let ops = match self.rendered.take() {
                Some(_) => vec![WindowOp::Clear],
                None => Vec::new(),
            };
            self.visible = None;
            self.scroll_offset = 0;
            return WindowUpdate {
                scroll_offset: 0,
                visible: None,
                rendered: None,
                ops,
                rebuilt: true,
            };
        }

        if request.snap {
            if let Some(p) = geometry.item_at(offset) {
                let (top, bottom) = (geometry.top(p), geometry.bottom(p));
                offset = if offset - top <= bottom - offset { top } else { bottom };
                offset = offset.min(max_scroll);
            }
        }

        let first = geometry.item_at(offset).unwrap_or(count - 1);
        let last = geometry
            .item_at(offset.saturating_add(request.viewport))
            .unwrap_or(count - 1);
        let visible = RenderedRange::new(first, last);
        let target = visible.expanded(self.margin, count);

        let incremental = match self.rendered {
            Some(prev) if !request.force_rebuild && prev.last() < count => {
                prev.expanded(self.margin, count).covers(&visible)
                    && target.first() <= prev.last()
                    && prev.first() <= target.last()
            }
            _ => false,
        };

        let ops = match (incremental, self.rendered) {
            (true, Some(prev)) => edge_ops(prev, target),
            _ => vec![WindowOp::Rebuild { range: target }],
        };
        debug!(
            offset,
            first = target.first(),
            last = target.last(),
            incremental,
            ops = ops.len(),
            "window positioned"
        );

        self.scroll_offset = offset;
        self.visible = Some(visible);
        self.rendered = Some(target);
        WindowUpdate {
            scroll_offset: offset,
            visible: Some(visible),
            rendered: Some(target),
            ops,
            rebuilt: !incremental,
        }
    }
}

/// Operations turning `prev` into `next` one edge item at a time.
fn edge_ops(prev: RenderedRange, next: RenderedRange) -> Vec<WindowOp> {
    let mut ops = Vec::new();
    for position in prev.first()..next.first() {
        ops.push(WindowOp::RemoveFirst { position });
    }
    for position in (next.last() + 1..=prev.last()).rev() {
        ops.push(WindowOp::RemoveLast { position });
    }
    for position in (next.first()..prev.first()).rev() {
        ops.push(WindowOp::Prepend {
            position,
            odd: position % 2 == 1,
        });
    }
    for position in prev.last() + 1..=next.last() {
        ops.push(WindowOp::Append {
            position,
            odd: position % 2 == 1,
        });
    }
    ops
}
