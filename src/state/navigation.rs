//! Scrolling, current-row navigation and the after-paint phase.
//!
//! All navigation resolves to a pixel offset through the geometry and ends in
//! one positioning pass; measured heights flow back in `after_paint`.

use super::events::ListEvent;
use super::list_context::ListContext;
use crate::model::{ListError, RowId, RowIndex, ValidationError};
use crate::view::HeightProbe;
use crate::view_state::{
    Align, Anchor, AnchorKey, DimensionCallback, DimensionFlags, DimensionOutcome, DisplayItem,
    ScrollTarget,
};
use tracing::debug;

impl ListContext {
    /// Scroll to `target`.
    pub fn scroll_to(&mut self, target: ScrollTarget) {
        self.position(target, false, false);
    }

    /// Scroll to `target`, snapping to the nearest item boundary.
    pub fn scroll_to_snapped(&mut self, target: ScrollTarget) {
        self.position(target, false, true);
    }

    /// The viewport was resized to `viewport` pixels.
    pub fn resize(&mut self, viewport: u64) {
        if viewport == self.viewport && self.window.rendered().is_some() {
            return;
        }
        self.viewport = viewport;
        self.position(ScrollTarget::Offset(self.window.scroll_offset()), false, false);
        self.events.emit(ListEvent::ScrollGeometryChanged {
            total_height: self.geometry.total(),
            max_scroll: self.geometry.max_scroll(viewport),
        });
    }

    /// Bring display `position` into view with `align`. Returns false for a
    /// position outside the display list.
    pub fn scroll_to_display_item(&mut self, position: usize, align: Align) -> bool {
        if position >= self.display.len() {
            return false;
        }
        self.scroll_to(ScrollTarget::Item { position, align });
        true
    }

    /// Bring the row `id` into view, expanding collapsed ancestors.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`].
    pub fn scroll_to_row(&mut self, id: &RowId, align: Align) -> Result<(), ListError> {
        let index = self
            .store
            .index_of(id)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        self.reveal_row(index);
        if let Some(position) = self.display.row_position(index) {
            self.scroll_to_display_item(position, align);
        }
        Ok(())
    }

    /// Centre the current row in the viewport. Returns false when there is
    /// no current row.
    pub fn center_current_row(&mut self) -> bool {
        if self.current_row.is_unsaved() {
            return false;
        }
        let Some(index) = self.store.index_of(&self.current_row) else {
            return false;
        };
        self.reveal_row(index);
        match self.display.row_position(index) {
            Some(position) => self.scroll_to_display_item(position, Align::Center),
            None => false,
        }
    }

    /// Move the current row by `delta` displayed rows (headers are skipped),
    /// stopping at either end, and keep it in view. Without a current row,
    /// a forward move selects the first row and a backward move the last.
    ///
    /// A current row hidden by a collapse is revealed first, so the move
    /// starts from it.
    pub fn move_current(&mut self, delta: isize) -> Option<RowId> {
        if let Some(index) = self
            .store
            .index_of(&self.current_row)
            .filter(|_| !self.current_row.is_unsaved())
        {
            self.reveal_row(index);
        }
        let rows: Vec<RowIndex> = self.display.visible_rows().collect();
        if rows.is_empty() {
            return None;
        }
        let here = self
            .store
            .index_of(&self.current_row)
            .filter(|_| !self.current_row.is_unsaved())
            .and_then(|index| rows.iter().position(|r| *r == index));
        let target = match here {
            Some(i) => i.saturating_add_signed(delta).min(rows.len() - 1),
            None if delta < 0 => rows.len() - 1,
            None => 0,
        };
        let index = rows[target];
        let id = self.store.row(index)?.id.clone();
        self.set_current_unchecked(id.clone());
        if let Some(position) = self.display.row_position(index) {
            self.scroll_to_display_item(position, Align::Nearest);
        }
        Some(id)
    }

    /// Re-derive display list and geometry, keeping the first visible item
    /// at the same distance from the viewport top.
    pub fn smart_reposition(&mut self) {
        let anchor = self.capture_anchor();
        self.refresh_structure(anchor);
    }

    /// Queue a dimension update for the next [`after_paint`](Self::after_paint).
    /// Requests made before then are merged and `callback`s run once, in order.
    pub fn request_dimension_update(
        &mut self,
        flags: DimensionFlags,
        callback: Option<DimensionCallback>,
    ) {
        self.deferred.request(flags, callback);
    }

    /// True when an update waits for the next paint.
    pub fn dimension_update_pending(&self) -> bool {
        self.deferred.is_pending()
    }

    /// Process pending dimension updates after the host has painted.
    ///
    /// Measures the rendered items through `probe`, refreshes the average
    /// height and repositions only if a height changed. Returns `None` when
    /// nothing was pending.
    pub fn after_paint(&mut self, probe: &dyn HeightProbe) -> Option<DimensionOutcome> {
        let (flags, callbacks) = self.deferred.take()?;

        let mut measured_changed = false;
        if flags.update_rows || flags.force_redraw {
            if let Some(rendered) = self.window.rendered() {
                for position in rendered.positions() {
                    let Some(item) = self.display.get(position) else {
                        continue;
                    };
                    if let Some(height) = probe.measure(item) {
                        measured_changed |= self.heights.record(item, height);
                    }
                }
            }
        }

        let average_changed = self.average_height() != self.geometry.average();
        let heights_changed = measured_changed || average_changed;
        if heights_changed {
            let anchor = self.capture_anchor();
            self.rebuild_geometry(self.window.rendered());
            let offset = anchor
                .as_ref()
                .and_then(|a| self.anchor_offset(a))
                .unwrap_or_else(|| self.window.scroll_offset());
            self.position(ScrollTarget::Offset(offset), flags.force_redraw, false);
        } else if flags.force_redraw {
            self.position(ScrollTarget::Offset(self.window.scroll_offset()), true, false);
        }

        if heights_changed || flags.update_scrollbar {
            self.events.emit(ListEvent::ScrollGeometryChanged {
                total_height: self.geometry.total(),
                max_scroll: self.geometry.max_scroll(self.viewport),
            });
        }

        let outcome = DimensionOutcome {
            heights_changed,
            scroll_offset: self.window.scroll_offset(),
            rendered: self.window.rendered(),
        };
        debug!(
            heights_changed,
            callbacks = callbacks.len(),
            offset = outcome.scroll_offset,
            "after paint"
        );
        for callback in callbacks {
            callback(&outcome);
        }
        Some(outcome)
    }

    /// The first visible item and its distance from the scroll offset.
    pub(super) fn capture_anchor(&self) -> Option<Anchor> {
        let position = self.window.visible()?.first();
        let key = match self.display.get(position)? {
            DisplayItem::Row(r) => AnchorKey::Row(self.store.row(r)?.id.clone()),
            DisplayItem::Header(h) => AnchorKey::Header(
                self.partition
                    .key_path(h)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
        };
        Some(Anchor::capture(
            key,
            &self.geometry,
            position,
            self.window.scroll_offset(),
        ))
    }

    /// Offset that puts the anchored item back in place. A hidden item falls
    /// back to its nearest displayed ancestor header.
    pub(super) fn anchor_offset(&self, anchor: &Anchor) -> Option<u64> {
        if let Some(position) = self.anchor_position(anchor) {
            return Some(anchor.restore(&self.geometry, position));
        }
        let group = match &anchor.key {
            AnchorKey::Row(id) => self.partition.logical_group(self.store.index_of(id)?)?,
            AnchorKey::Header(labels) => self.partition.find_by_key_path(labels)?,
        };
        self.partition
            .path(group)
            .into_iter()
            .rev()
            .find_map(|h| self.display.header_position(h))
            .map(|position| self.geometry.top(position))
    }

    /// Current display position of the anchored item, if displayed.
    pub(super) fn anchor_position(&self, anchor: &Anchor) -> Option<usize> {
        match &anchor.key {
            AnchorKey::Row(id) => self.display.row_position(self.store.index_of(id)?),
            AnchorKey::Header(labels) => self
                .display
                .header_position(self.partition.find_by_key_path(labels)?),
        }
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
