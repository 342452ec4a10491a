//! Page requests and completions for paged lists.
//!
//! Completed pages are validated in full before anything is merged, so a
//! malformed response leaves the list as it was. A `Prev` page shifts the
//! rendered range, measured heights and scroll offset by the rows it adds in
//! front, keeping the first visible item still on screen.

use super::events::ListEvent;
use super::list_context::ListContext;
use crate::grouping::GroupPartition;
use crate::model::{
    HeaderIndex, ListError, PageDirection, PageFetchError, PageResponse, RequestId, Row, RowId,
    UnsupportedConfig, ValidationError,
};
use crate::paging::PagingState;
use crate::store::CacheBounds;
use crate::view_state::{prep_display, DimensionFlags, ScrollTarget};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

impl ListContext {
    /// Request the first page (initial load or a jump to the top).
    ///
    /// Returns the request id, or `None` if a request is already in flight.
    ///
    /// # Errors
    ///
    /// [`UnsupportedConfig::PagingDisabled`] on a full list.
    pub fn request_first_page(&mut self) -> Result<Option<RequestId>, ListError> {
        self.request_page(PageDirection::First)
    }

    /// Request the last page (a jump to the bottom).
    ///
    /// # Errors
    ///
    /// [`UnsupportedConfig::PagingDisabled`] on a full list.
    pub fn request_last_page(&mut self) -> Result<Option<RequestId>, ListError> {
        self.request_page(PageDirection::Last)
    }

    fn request_page(&mut self, direction: PageDirection) -> Result<Option<RequestId>, ListError> {
        let paging = self
            .paging
            .as_mut()
            .ok_or(UnsupportedConfig::PagingDisabled)?;
        let Some(request) = paging.load_cache_page(direction, None) else {
            return Ok(None);
        };
        let id = request.id;
        self.dispatch(request);
        Ok(Some(id))
    }

    /// Paging state, `None` on a full list.
    pub fn paging_state(&self) -> Option<&PagingState> {
        self.paging.as_ref().map(|p| p.state())
    }

    /// Whether the cache reaches both ends of the data set.
    pub fn cache_bounds(&self) -> CacheBounds {
        self.store.bounds()
    }

    /// Resolve page request `id` with the host's result.
    ///
    /// A completion for an unknown or superseded id is ignored. A fetch
    /// failure is logged and the controller returns to idle.
    ///
    /// # Errors
    ///
    /// - [`UnsupportedConfig::PagingDisabled`] on a full list
    /// - [`ValidationError`] for a malformed response, invalid group headers,
    ///   or headers on a `Prev`/`Next` page; the cache is unchanged
    pub fn on_page_loaded(
        &mut self,
        id: RequestId,
        result: Result<Value, PageFetchError>,
    ) -> Result<(), ListError> {
        let paging = self
            .paging
            .as_mut()
            .ok_or(UnsupportedConfig::PagingDisabled)?;
        let Some(request) = paging.complete(id) else {
            return Ok(());
        };
        let direction = request.direction;

        let value = match result {
            Ok(value) => value,
            Err(e) => {
                warn!(id = id.get(), %direction, error = %e, "page fetch failed");
                self.events.emit(ListEvent::PageFailed {
                    direction,
                    reason: e.reason,
                });
                return Ok(());
            }
        };

        let response = PageResponse::from_json(&value)?;
        if response.group_headers.is_some() && !direction.is_jump() {
            return Err(ValidationError::UnexpectedGroupHeaders { direction }.into());
        }
        info!(id = id.get(), %direction, rows = response.rows.len(), "page loaded");

        match direction {
            PageDirection::First | PageDirection::Last => self.replace_with_page(direction, response)?,
            PageDirection::Next => self.append_page(response)?,
            PageDirection::Prev => self.prepend_page(response)?,
        }
        self.events.emit(ListEvent::PageLoaded {
            direction,
            row_count: self.store.len(),
        });
        Ok(())
    }

    fn replace_with_page(
        &mut self,
        direction: PageDirection,
        response: PageResponse,
    ) -> Result<(), ListError> {
        let config = response.groups.unwrap_or_default();
        let partition = GroupPartition::from_external(
            response.group_headers.unwrap_or_default(),
            response.membership,
            config,
        )?;
        self.store
            .merge_page(direction, response.rows, response.is_first, response.is_last)?;

        self.group_config = partition.config().clone();
        self.partition = partition;
        self.external_groups = true;
        self.heights
            .reset(self.store.len(), self.partition.headers().len());
        if !self.current_row.is_unsaved() && self.store.index_of(&self.current_row).is_none() {
            self.set_current_unchecked(RowId::unsaved());
        }
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        self.events.emit(ListEvent::GroupingChanged {
            header_count: self.partition.headers().len(),
        });

        self.display = prep_display(self.store.len(), &self.partition);
        self.rebuild_geometry(None);
        let target = match direction {
            PageDirection::Last => ScrollTarget::Bottom,
            _ => ScrollTarget::Top,
        };
        self.position(target, true, false);
        self.deferred.request(DimensionFlags::ALL, None);
        Ok(())
    }

    fn append_page(&mut self, response: PageResponse) -> Result<(), ListError> {
        let mut groups = self.fresh_groups(response.rows.iter().zip(&response.membership));
        self.partition
            .check_membership(&groups, self.store.len())?;
        let merge = self.store.merge_page(
            PageDirection::Next,
            response.rows,
            response.is_first,
            response.is_last,
        )?;
        groups.resize(merge.appended, None);
        self.partition.append_rows(groups)?;
        self.heights.append_rows(merge.appended);

        self.display = prep_display(self.store.len(), &self.partition);
        self.rebuild_geometry(self.window.rendered());
        self.position(
            ScrollTarget::Offset(self.window.scroll_offset()),
            merge.updated > 0,
            false,
        );
        self.deferred.request(
            DimensionFlags {
                update_scrollbar: true,
                ..DimensionFlags::NONE
            },
            None,
        );
        Ok(())
    }

    fn prepend_page(&mut self, response: PageResponse) -> Result<(), ListError> {
        let anchor = self.capture_anchor();
        let old_first = self.window.visible().map(|v| v.first());
        let old_offset = self.window.scroll_offset();

        // Rows land at the head in reverse page order.
        let mut groups =
            self.fresh_groups(response.rows.iter().zip(&response.membership).rev());
        self.partition.check_membership(&groups, 0)?;
        let merge = self.store.merge_page(
            PageDirection::Prev,
            response.rows,
            response.is_first,
            response.is_last,
        )?;
        groups.resize(merge.prepended, None);
        self.partition.prepend_rows(groups)?;
        self.heights.prepend_rows(merge.prepended);
        self.display = prep_display(self.store.len(), &self.partition);

        let new_first = anchor.as_ref().and_then(|a| self.anchor_position(a));
        match (anchor, old_first, new_first) {
            (Some(anchor), Some(old), Some(new)) if new >= old => {
                let shift = new - old;
                let trusted = self.window.rendered().map(|r| r.shifted(shift));
                self.rebuild_geometry(trusted);
                let offset = anchor.restore(&self.geometry, new);
                self.window
                    .shift(shift, offset.saturating_sub(old_offset));
                debug!(shift, offset, "prepended page, window shifted");
                // Parity of every materialized item flips with an odd shift.
                self.position(
                    ScrollTarget::Offset(offset),
                    merge.updated > 0 || shift % 2 == 1,
                    false,
                );
            }
            _ => {
                self.rebuild_geometry(None);
                self.position(ScrollTarget::Offset(old_offset), true, false);
            }
        }
        self.deferred.request(
            DimensionFlags {
                update_scrollbar: true,
                ..DimensionFlags::NONE
            },
            None,
        );
        Ok(())
    }

    /// Groups of the page rows that the merge will add (rows with ids not yet
    /// cached, first occurrence only), in merge order.
    fn fresh_groups<'a>(
        &self,
        rows: impl Iterator<Item = (&'a Row, &'a Option<HeaderIndex>)>,
    ) -> Vec<Option<HeaderIndex>> {
        let mut seen = HashSet::new();
        rows.filter(|(row, _)| {
            row.id.is_unsaved()
                || (self.store.index_of(&row.id).is_none() && seen.insert(row.id.clone()))
        })
        .map(|(_, group)| *group)
        .collect()
    }
}

#[cfg(test)]
#[path = "paging_handler_tests.rs"]
mod tests;
