//! Coalesced dimension updates for the after-paint phase.
//!
//! Requests made between two paints are merged: their flags are unioned and
//! their callbacks queued, and the whole batch runs once when the host calls
//! `after_paint`.

use super::types::RenderedRange;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// What a dimension update should also do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionFlags {
    /// Re-run positioning so the rendered rows follow new heights.
    pub update_rows: bool,
    /// Republish scroll geometry.
    pub update_scrollbar: bool,
    /// Rebuild the rendered range even if nothing moved.
    pub force_redraw: bool,
}

impl DimensionFlags {
    /// No extra work.
    pub const NONE: Self = Self {
        update_rows: false,
        update_scrollbar: false,
        force_redraw: false,
    };

    /// Every flag set.
    pub const ALL: Self = Self {
        update_rows: true,
        update_scrollbar: true,
        force_redraw: true,
    };
}

impl BitOr for DimensionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            update_rows: self.update_rows || rhs.update_rows,
            update_scrollbar: self.update_scrollbar || rhs.update_scrollbar,
            force_redraw: self.force_redraw || rhs.force_redraw,
        }
    }
}

impl BitOrAssign for DimensionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// State handed to completion callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionOutcome {
    /// Any measured height changed during the pass.
    pub heights_changed: bool,
    /// Scroll offset after the pass.
    pub scroll_offset: u64,
    /// Rendered range after the pass.
    pub rendered: Option<RenderedRange>,
}

/// Callback run once the coalesced update has been processed.
pub type DimensionCallback = Box<dyn FnOnce(&DimensionOutcome)>;

/// Pending flags and callbacks.
#[derive(Default)]
pub struct DeferredDimensions {
    pending: Option<DimensionFlags>,
    callbacks: Vec<DimensionCallback>,
}

impl fmt::Debug for DeferredDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredDimensions")
            .field("pending", &self.pending)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl DeferredDimensions {
    /// Nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request, merging with anything already pending.
    pub fn request(&mut self, flags: DimensionFlags, callback: Option<DimensionCallback>) {
        *self.pending.get_or_insert(DimensionFlags::NONE) |= flags;
        self.callbacks.extend(callback);
    }

    /// True if an update is waiting for the next paint.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Unioned flags of the pending requests.
    pub fn pending_flags(&self) -> Option<DimensionFlags> {
        self.pending
    }

    /// Take the batch, leaving nothing pending.
    pub fn take(&mut self) -> Option<(DimensionFlags, Vec<DimensionCallback>)> {
        let flags = self.pending.take()?;
        Some((flags, std::mem::take(&mut self.callbacks)))
    }
}
