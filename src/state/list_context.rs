//! The owning context of one list.
//!
//! `ListContext` owns the row store and every side table derived from it, and
//! keeps them aligned through each mutation:
//!
//! ```text
//! row store ─► grouping pass ─► display list ─► geometry ─► window ─► paging
//! ```
//!
//! Every entry point takes `&mut self` and runs to completion. Changes to the
//! render surface are queued as [`RenderOp`]s for the host to drain with
//! [`ListContext::take_render_ops`]; measurement happens later, in
//! [`ListContext::after_paint`].
//!
//! Navigation lives in `navigation.rs`, page handling in `paging_handler.rs`
//! and layout persistence in `layout_handler.rs`; they extend this type.

use super::events::{EventChannel, ListEvent};
use crate::config::{ListConfig, PagingMode};
use crate::grouping::{group_data, GroupPartition, GroupingOptions, SortPlan};
use crate::model::{
    column_position, ColumnDescriptor, ColumnId, GroupConfig, GroupHeader, HeaderIndex, ListError,
    PageRequest, Row, RowId, RowIndex, SortSpec, UnsupportedConfig, ValidationError,
};
use crate::paging::{PageSource, PagingController};
use crate::storage::ColumnLayout;
use crate::store::{store_for, RowStore};
use crate::view::{RenderOp, RenderedItem, RowRenderer};
use crate::view_state::{
    prep_display, Anchor, DeferredDimensions, DimensionFlags, DisplayItem, DisplayList, Geometry,
    HeightCache, ItemMetrics, PositionRequest, RenderedRange, ScrollTarget, WindowManager,
    WindowOp,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Positioning passes allowed after the first to settle on measurements
/// that entered the trusted range.
const SETTLE_PASSES: usize = 4;

/// One virtualized list: rows, grouping, display order, geometry, window and
/// (in paged mode) the page cache controller.
pub struct ListContext {
    pub(super) config: ListConfig,
    pub(super) columns: Vec<ColumnDescriptor>,
    pub(super) column_layout: Vec<ColumnLayout>,
    pub(super) store: Box<dyn RowStore>,
    pub(super) group_config: GroupConfig,
    pub(super) sort: Option<SortSpec>,
    pub(super) partition: GroupPartition,
    /// Headers were supplied from outside rather than by a grouping pass.
    pub(super) external_groups: bool,
    pub(super) display: DisplayList,
    pub(super) heights: HeightCache,
    pub(super) geometry: Geometry,
    pub(super) window: WindowManager,
    pub(super) viewport: u64,
    pub(super) deferred: DeferredDimensions,
    pub(super) paging: Option<PagingController>,
    pub(super) page_source: Option<Box<dyn PageSource>>,
    pub(super) renderer: Box<dyn RowRenderer>,
    pub(super) render_ops: Vec<RenderOp>,
    pub(super) current_row: RowId,
    pub(super) events: EventChannel,
}

impl fmt::Debug for ListContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListContext")
            .field("paging", &self.config.paging)
            .field("rows", &self.store.len())
            .field("headers", &self.partition.headers().len())
            .field("display", &self.display.len())
            .field("scroll_offset", &self.window.scroll_offset())
            .field("rendered", &self.window.rendered())
            .field("current_row", &self.current_row)
            .finish_non_exhaustive()
    }
}

impl ListContext {
    /// Empty list over `columns`. The row store and paging controller follow
    /// `config.paging`.
    pub fn new(
        config: ListConfig,
        columns: Vec<ColumnDescriptor>,
        renderer: Box<dyn RowRenderer>,
    ) -> Self {
        let paging = match config.paging {
            PagingMode::Full => None,
            PagingMode::Paged => Some(PagingController::new(
                config.prefetch_margin,
                config.page_size,
            )),
        };
        let store = store_for(config.paging);
        let geometry = Geometry::new(config.default_row_height);
        let window = WindowManager::new(config.over_render_margin);
        info!(paging = %config.paging, columns = columns.len(), "list created");
        Self {
            config,
            columns,
            column_layout: Vec::new(),
            store,
            group_config: GroupConfig::none(),
            sort: None,
            partition: GroupPartition::default(),
            external_groups: false,
            display: DisplayList::default(),
            heights: HeightCache::default(),
            geometry,
            window,
            viewport: 0,
            deferred: DeferredDimensions::new(),
            paging,
            page_source: None,
            renderer,
            render_ops: Vec::new(),
            current_row: RowId::unsaved(),
            events: EventChannel::new(),
        }
    }

    /// Attach the channel page requests are sent through.
    pub fn with_page_source(mut self, source: Box<dyn PageSource>) -> Self {
        self.page_source = Some(source);
        self
    }

    // ===== Accessors =====

    /// Effective configuration.
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Column descriptors.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Rows in store order.
    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    /// Row at `index`.
    pub fn row(&self, index: RowIndex) -> Option<&Row> {
        self.store.row(index)
    }

    /// Store position of `id`.
    pub fn index_of(&self, id: &RowId) -> Option<RowIndex> {
        self.store.index_of(id)
    }

    /// The row store.
    pub fn store(&self) -> &dyn RowStore {
        self.store.as_ref()
    }

    /// Active grouping.
    pub fn group_config(&self) -> &GroupConfig {
        &self.group_config
    }

    /// Active sort.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Headers and row membership.
    pub fn partition(&self) -> &GroupPartition {
        &self.partition
    }

    /// Header at `index`.
    pub fn header(&self, index: HeaderIndex) -> Option<&GroupHeader> {
        self.partition.header(index)
    }

    /// Display order.
    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    /// Effective heights of the display list.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> u64 {
        self.window.scroll_offset()
    }

    /// Viewport height.
    pub fn viewport(&self) -> u64 {
        self.viewport
    }

    /// Positions intersecting the viewport.
    pub fn visible(&self) -> Option<RenderedRange> {
        self.window.visible()
    }

    /// Materialized positions.
    pub fn rendered(&self) -> Option<RenderedRange> {
        self.window.rendered()
    }

    /// Sum of effective heights.
    pub fn total_height(&self) -> u64 {
        self.geometry.total()
    }

    /// Largest valid scroll offset for the current viewport.
    pub fn max_scroll(&self) -> u64 {
        self.geometry.max_scroll(self.viewport)
    }

    /// Current row (empty: none).
    pub fn current_row(&self) -> &RowId {
        &self.current_row
    }

    /// Materialized items, with fresh markup.
    pub fn rendered_items(&self) -> Vec<RenderedItem> {
        self.window
            .rendered()
            .map(|r| r.positions().filter_map(|p| self.rendered_item(p)).collect())
            .unwrap_or_default()
    }

    /// Take the render operations queued since the last call.
    pub fn take_render_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.render_ops)
    }

    /// Subscribe to list events.
    pub fn subscribe(&mut self) -> Receiver<ListEvent> {
        self.events.subscribe()
    }

    // ===== Rows =====

    /// Replace every row (a full reload).
    ///
    /// Measured heights are forgotten. Rows are regrouped when grouping or a
    /// sort is active; collapse state survives when the grouping is unchanged.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateRowId`]; the list is unchanged on error.
    pub fn load_rows(&mut self, rows: Vec<Row>) -> Result<(), ListError> {
        let anchor = self.capture_anchor();
        self.store.replace_all(rows)?;
        self.external_groups = false;
        if self.regroups_on_change() {
            self.regroup()?;
        } else {
            self.partition = GroupPartition::ungrouped(self.store.len());
            self.heights.reset(self.store.len(), 0);
        }
        self.drop_missing_current_row();
        info!(rows = self.store.len(), "rows loaded");
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        self.refresh_structure(anchor);
        Ok(())
    }

    /// Replace every row together with externally computed group headers.
    ///
    /// `membership[i]` is the deepest header of `rows[i]`. Rows are shown in
    /// the order given; no grouping pass runs until the grouping is changed.
    ///
    /// # Errors
    ///
    /// Header validation failures, a membership list of the wrong length, or
    /// duplicate row ids. The list is unchanged on error.
    pub fn load_grouped_rows(
        &mut self,
        rows: Vec<Row>,
        headers: Vec<GroupHeader>,
        membership: Vec<Option<HeaderIndex>>,
        config: GroupConfig,
    ) -> Result<(), ListError> {
        if membership.len() != rows.len() {
            return Err(ValidationError::MalformedResponse {
                message: format!(
                    "{} rows but {} group memberships",
                    rows.len(),
                    membership.len()
                ),
            }
            .into());
        }
        let partition = GroupPartition::from_external(headers, membership, config)?;
        let anchor = self.capture_anchor();
        self.store.replace_all(rows)?;
        self.group_config = partition.config().clone();
        self.partition = partition;
        self.external_groups = true;
        self.heights
            .reset(self.store.len(), self.partition.headers().len());
        self.drop_missing_current_row();
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        self.events.emit(ListEvent::GroupingChanged {
            header_count: self.partition.headers().len(),
        });
        self.refresh_structure(anchor);
        Ok(())
    }

    /// Insert `row` at `position` (default: the end).
    ///
    /// With client grouping or sorting active the rows are regrouped and the
    /// new row lands where the ordering puts it. Otherwise it stays where it
    /// was inserted and joins the group of its neighbour.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateRowId`].
    pub fn insert_row(&mut self, position: Option<usize>, row: Row) -> Result<RowIndex, ListError> {
        let anchor = self.capture_anchor();
        let id = row.id.clone();
        let position = position.unwrap_or(self.store.len()).min(self.store.len());
        let index = self.insert_untracked(position, row)?;
        if self.regroups_on_change() {
            self.regroup()?;
        }
        debug!(row = %id, position = index.get(), "row inserted");
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        self.refresh_structure(anchor);
        Ok(self.store.index_of(&id).unwrap_or(index))
    }

    /// Append rows at the end, as one change.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateRowId`] if any id is already cached or
    /// repeated; nothing is appended on error.
    pub fn append_rows(&mut self, rows: Vec<Row>) -> Result<usize, ListError> {
        let mut seen = HashSet::new();
        for row in rows.iter().filter(|r| !r.id.is_unsaved()) {
            if self.store.index_of(&row.id).is_some() || !seen.insert(&row.id) {
                return Err(ValidationError::DuplicateRowId { id: row.id.clone() }.into());
            }
        }
        let anchor = self.capture_anchor();
        let count = rows.len();
        for row in rows {
            self.insert_untracked(self.store.len(), row)?;
        }
        if self.regroups_on_change() {
            self.regroup()?;
        }
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        self.refresh_structure(anchor);
        Ok(count)
    }

    /// Overwrite the row identified by `id` with `row` (which may carry a new
    /// id, e.g. the server id of a freshly saved row).
    ///
    /// The list is regrouped only if a group or sort column changed value;
    /// otherwise the row is updated in place and no other position moves.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`] or [`ValidationError::DuplicateRowId`].
    pub fn update_row(&mut self, id: &RowId, row: Row) -> Result<RowIndex, ListError> {
        let index = self
            .store
            .index_of(id)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        let key_changed = match (self.regroups_on_change(), self.store.row(index)) {
            (true, Some(old)) => {
                let plan = SortPlan::new(&self.columns, &self.group_config, self.sort.as_ref())?;
                let changed = plan
                    .ordering_columns()
                    .any(|c| old.value(c) != row.value(c));
                changed
            }
            _ => false,
        };
        let new_id = row.id.clone();

        if key_changed {
            let anchor = self.capture_anchor();
            self.store.update(id, row)?;
            self.follow_current_row(id, &new_id);
            self.regroup()?;
            debug!(row = %new_id, "ordering key changed, regrouped");
            self.events.emit(ListEvent::RowsChanged {
                row_count: self.store.len(),
            });
            self.refresh_structure(anchor);
            return Ok(self.store.index_of(&new_id).unwrap_or(index));
        }

        self.store.update(id, row)?;
        self.follow_current_row(id, &new_id);
        self.heights.invalidate_row(index);
        self.refresh_row(index);
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        Ok(index)
    }

    /// Remove the row identified by `id`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`].
    pub fn remove_row(&mut self, id: &RowId) -> Result<Row, ListError> {
        let anchor = self.capture_anchor();
        let (index, row) = self.store.remove(id)?;
        self.heights.remove_row(index.get());
        self.partition.remove_row(index.get());
        if !self.current_row.is_unsaved() && self.current_row == row.id {
            self.set_current_unchecked(RowId::unsaved());
        }
        debug!(row = %row.id, position = index.get(), "row removed");
        self.events.emit(ListEvent::RowsChanged {
            row_count: self.store.len(),
        });
        self.refresh_structure(anchor);
        Ok(row)
    }

    /// Set or clear the extra rendered height of one row.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`].
    pub fn set_extra_height(&mut self, id: &RowId, extra: Option<u32>) -> Result<(), ListError> {
        let index = self
            .store
            .index_of(id)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        self.store
            .cache_mut()
            .with_row_mut(index.get(), |row| row.extra_height = extra);
        self.heights.invalidate_row(index);
        self.refresh_row(index);
        Ok(())
    }

    /// Earliest row whose `column` value equals `needle`, by binary search.
    /// Meaningful when rows are sorted on that column.
    ///
    /// # Errors
    ///
    /// [`UnsupportedConfig::UnknownColumn`].
    pub fn search(&self, column: &ColumnId, needle: &str) -> Result<Option<RowIndex>, ListError> {
        let position = column_position(&self.columns, column).ok_or_else(|| {
            UnsupportedConfig::UnknownColumn {
                column: column.clone(),
            }
        })?;
        Ok(self
            .store
            .search(position, self.columns[position].data_type, needle))
    }

    // ===== Grouping =====

    /// Change the client-side grouping and regroup.
    ///
    /// # Errors
    ///
    /// - [`UnsupportedConfig::GroupingWhilePaged`] on a paged list
    /// - [`UnsupportedConfig::UnknownColumn`] / [`UnsupportedConfig::NotGroupable`]
    ///
    /// The list is unchanged on error.
    pub fn set_group_config(&mut self, config: GroupConfig) -> Result<(), ListError> {
        if self.store.mode() == PagingMode::Paged {
            return Err(UnsupportedConfig::GroupingWhilePaged.into());
        }
        SortPlan::new(&self.columns, &config, self.sort.as_ref())?;
        let anchor = self.capture_anchor();
        self.group_config = config;
        self.external_groups = false;
        if self.regroups_on_change() {
            self.regroup()?;
        } else {
            self.partition = GroupPartition::ungrouped(self.store.len());
            self.heights.reset(self.store.len(), 0);
            self.events.emit(ListEvent::GroupingChanged { header_count: 0 });
        }
        info!(levels = self.group_config.depth(), "grouping changed");
        self.refresh_structure(anchor);
        Ok(())
    }

    /// Change the active sort.
    ///
    /// A full list is re-sorted (and regrouped) in place. A paged list drops
    /// its cache and requests the first page under the new sort.
    ///
    /// # Errors
    ///
    /// [`UnsupportedConfig::UnknownColumn`]; the list is unchanged on error.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<(), ListError> {
        if let Some(spec) = &sort {
            column_position(&self.columns, &spec.column_id).ok_or_else(|| {
                UnsupportedConfig::UnknownColumn {
                    column: spec.column_id.clone(),
                }
            })?;
        }
        self.sort = sort;
        match self.store.mode() {
            PagingMode::Full => {
                let anchor = self.capture_anchor();
                if self.regroups_on_change() {
                    self.regroup()?;
                }
                self.refresh_structure(anchor);
            }
            PagingMode::Paged => {
                info!("sort changed, reloading from the first page");
                self.store.clear();
                self.partition = GroupPartition::ungrouped(0);
                self.heights.reset(0, 0);
                if let Some(paging) = self.paging.as_mut() {
                    paging.reset();
                }
                self.drop_missing_current_row();
                self.events.emit(ListEvent::RowsChanged { row_count: 0 });
                self.refresh_structure(None);
                self.request_first_page()?;
            }
        }
        Ok(())
    }

    /// Flip the collapsed state of `header`. Returns the new state, or `None`
    /// for an unknown header.
    pub fn toggle_collapsed(&mut self, header: HeaderIndex) -> Option<bool> {
        let anchor = self.capture_anchor();
        let collapsed = self.partition.toggle_collapsed(header)?;
        self.events.emit(ListEvent::CollapseChanged { header, collapsed });
        self.refresh_structure(anchor);
        Some(collapsed)
    }

    /// Set the collapsed state of `header`. Returns true if it changed.
    pub fn set_collapsed(&mut self, header: HeaderIndex, collapsed: bool) -> bool {
        let anchor = self.capture_anchor();
        if !self.partition.set_collapsed(header, collapsed) {
            return false;
        }
        self.events.emit(ListEvent::CollapseChanged { header, collapsed });
        self.refresh_structure(anchor);
        true
    }

    /// Collapse every header.
    pub fn collapse_all(&mut self) -> bool {
        self.set_all_collapsed(true)
    }

    /// Expand every header.
    pub fn expand_all(&mut self) -> bool {
        self.set_all_collapsed(false)
    }

    fn set_all_collapsed(&mut self, collapsed: bool) -> bool {
        let anchor = self.capture_anchor();
        if !self.partition.set_all_collapsed(collapsed) {
            return false;
        }
        self.events.emit(ListEvent::GroupingChanged {
            header_count: self.partition.headers().len(),
        });
        self.refresh_structure(anchor);
        true
    }

    // ===== Current row =====

    /// Make `id` the current row (empty: clear). Collapsed ancestors of the
    /// row are expanded so it is displayed.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownRow`].
    pub fn set_current_row(&mut self, id: RowId) -> Result<(), ListError> {
        if id.is_unsaved() {
            self.set_current_unchecked(id);
            return Ok(());
        }
        let index = self
            .store
            .index_of(&id)
            .ok_or_else(|| ValidationError::UnknownRow { id: id.clone() })?;
        self.reveal_row(index);
        self.set_current_unchecked(id);
        Ok(())
    }

    /// Expand collapsed ancestors of `index`. Returns true if any changed.
    pub(super) fn reveal_row(&mut self, index: RowIndex) -> bool {
        let anchor = self.capture_anchor();
        if !self.partition.expand_ancestors(index) {
            return false;
        }
        self.refresh_structure(anchor);
        true
    }

    pub(super) fn set_current_unchecked(&mut self, id: RowId) {
        if self.current_row != id {
            self.current_row = id;
            self.events.emit(ListEvent::CurrentRowChanged {
                row: self.current_row.clone(),
            });
        }
    }

    fn follow_current_row(&mut self, old: &RowId, new: &RowId) {
        if !old.is_unsaved() && &self.current_row == old {
            self.set_current_unchecked(new.clone());
        }
    }

    fn drop_missing_current_row(&mut self) {
        if !self.current_row.is_unsaved() && self.store.index_of(&self.current_row).is_none() {
            self.set_current_unchecked(RowId::unsaved());
        }
    }

    // ===== Internal pipeline =====

    /// Client-side regrouping applies: a full store whose headers come from a
    /// grouping pass, with grouping or a sort active.
    pub(super) fn regroups_on_change(&self) -> bool {
        self.store.mode() == PagingMode::Full
            && !self.external_groups
            && (!self.group_config.is_empty() || self.sort.is_some())
    }

    /// Run the grouping pass over the store. Measured heights are forgotten.
    pub(super) fn regroup(&mut self) -> Result<(), UnsupportedConfig> {
        let options = GroupingOptions {
            collapsed_by_default: self.config.collapsed_by_default,
        };
        let mut rows = self.store.take_rows();
        let result = group_data(
            &mut rows,
            &self.columns,
            &self.group_config,
            self.sort.as_ref(),
            options,
            Some(&self.partition),
        );
        self.store.restore_rows(rows);
        self.partition = match result {
            Ok(partition) => partition,
            Err(e) => {
                self.partition = GroupPartition::ungrouped(self.store.len());
                self.heights.reset(self.store.len(), 0);
                return Err(e);
            }
        };
        self.heights
            .reset(self.store.len(), self.partition.headers().len());
        self.events.emit(ListEvent::GroupingChanged {
            header_count: self.partition.headers().len(),
        });
        Ok(())
    }

    /// Insert into the store and side tables without regrouping or
    /// refreshing. The row joins the group of its predecessor (or successor
    /// at the head).
    fn insert_untracked(&mut self, position: usize, row: Row) -> Result<RowIndex, ValidationError> {
        let membership = self.partition.membership();
        let group = position
            .checked_sub(1)
            .and_then(|p| membership.get(p))
            .or_else(|| membership.first())
            .copied()
            .flatten();
        let index = self.store.insert(position, row)?;
        self.heights.insert_row(index.get());
        self.partition.insert_row(index.get(), group);
        Ok(index)
    }

    /// Re-derive the display list and geometry after rows, grouping or
    /// collapse state changed, then put `anchor` back where it was.
    pub(super) fn refresh_structure(&mut self, anchor: Option<Anchor>) {
        self.display = prep_display(self.store.len(), &self.partition);
        self.rebuild_geometry(None);
        let offset = anchor
            .as_ref()
            .and_then(|a| self.anchor_offset(a))
            .unwrap_or_else(|| self.window.scroll_offset());
        self.position(ScrollTarget::Offset(offset), true, false);
        self.deferred.request(
            DimensionFlags {
                update_scrollbar: true,
                ..DimensionFlags::NONE
            },
            None,
        );
    }

    /// A single row's content or extra height changed in place.
    fn refresh_row(&mut self, index: RowIndex) {
        let Some(position) = self.display.row_position(index) else {
            return;
        };
        let metrics = ItemMetrics {
            items: self.display.items(),
            measured: &self.heights,
            rows: self.store.rows(),
        };
        self.geometry.refresh(&metrics, position);
        if self.window.rendered().is_some_and(|r| r.contains(position)) {
            if let Some(item) = self.rendered_item(position) {
                self.render_ops.push(RenderOp::Replace(item));
            }
            self.deferred.request(
                DimensionFlags {
                    update_rows: true,
                    update_scrollbar: true,
                    ..DimensionFlags::NONE
                },
                None,
            );
        }
        self.position(ScrollTarget::Offset(self.window.scroll_offset()), false, false);
    }

    /// Height the geometry falls back to for unmeasured items.
    pub(super) fn average_height(&self) -> u32 {
        self.heights
            .average()
            .unwrap_or(self.config.default_row_height)
    }

    /// Recompute every effective height, trusting measurements in `trusted`.
    pub(super) fn rebuild_geometry(&mut self, trusted: Option<RenderedRange>) {
        let average = self.average_height();
        let metrics = ItemMetrics {
            items: self.display.items(),
            measured: &self.heights,
            rows: self.store.rows(),
        };
        self.geometry.rebuild(&metrics, average, trusted);
    }

    fn retrust(&mut self, trusted: Option<RenderedRange>) -> bool {
        let metrics = ItemMetrics {
            items: self.display.items(),
            measured: &self.heights,
            rows: self.store.rows(),
        };
        self.geometry.retrust(&metrics, trusted)
    }

    /// Position the window at `target`, queue the resulting render operations
    /// and let the paging controller look at the new range.
    ///
    /// When the new rendered range brings cached measurements into the trusted
    /// range, `target` is resolved again on the updated geometry, up to
    /// [`SETTLE_PASSES`] times.
    pub(super) fn position(&mut self, target: ScrollTarget, force_rebuild: bool, snap: bool) {
        let before = (self.window.scroll_offset(), self.window.rendered());
        let mut request = PositionRequest {
            scroll_offset: target.resolve(&self.geometry, self.viewport, before.0),
            viewport: self.viewport,
            force_rebuild,
            snap,
        };
        let mut update = self.window.update_position(&self.geometry, request);
        for _ in 0..SETTLE_PASSES {
            if !self.retrust(update.rendered) {
                break;
            }
            request = PositionRequest {
                scroll_offset: target.resolve(&self.geometry, self.viewport, before.0),
                force_rebuild: false,
                ..request
            };
            let next = self.window.update_position(&self.geometry, request);
            update.ops.extend(next.ops);
            update.scroll_offset = next.scroll_offset;
            update.visible = next.visible;
            update.rendered = next.rendered;
        }

        let materialized = update.ops.iter().any(|op| {
            matches!(
                op,
                WindowOp::Rebuild { .. } | WindowOp::Prepend { .. } | WindowOp::Append { .. }
            )
        });
        self.apply_window_ops(update.ops);
        if materialized {
            self.deferred.request(
                DimensionFlags {
                    update_rows: true,
                    ..DimensionFlags::NONE
                },
                None,
            );
        }
        if before != (update.scroll_offset, update.rendered) {
            self.events.emit(ListEvent::WindowChanged {
                scroll_offset: update.scroll_offset,
                rendered: update.rendered,
            });
        }
        self.check_paging();
    }

    fn apply_window_ops(&mut self, ops: Vec<WindowOp>) {
        for op in ops {
            let render = match op {
                WindowOp::Rebuild { range } => RenderOp::Rebuild(
                    range
                        .positions()
                        .filter_map(|p| self.rendered_item(p))
                        .collect(),
                ),
                WindowOp::Clear => RenderOp::Clear,
                WindowOp::Prepend { position, .. } => match self.rendered_item(position) {
                    Some(item) => RenderOp::Prepend(item),
                    None => continue,
                },
                WindowOp::Append { position, .. } => match self.rendered_item(position) {
                    Some(item) => RenderOp::Append(item),
                    None => continue,
                },
                WindowOp::RemoveFirst { position } => RenderOp::RemoveFirst { position },
                WindowOp::RemoveLast { position } => RenderOp::RemoveLast { position },
            };
            self.render_ops.push(render);
        }
    }

    /// Markup for the item at display `position`.
    pub(super) fn rendered_item(&self, position: usize) -> Option<RenderedItem> {
        let item = self.display.get(position)?;
        let odd = position % 2 == 1;
        let markup = match item {
            DisplayItem::Row(r) => self.renderer.row_markup(self.store.row(r)?, odd),
            DisplayItem::Header(h) => self.renderer.header_markup(self.partition.header(h)?, odd),
        };
        Some(RenderedItem {
            position,
            item,
            odd,
            markup,
        })
    }

    /// Ask the paging controller whether the rendered rows need a page.
    fn check_paging(&mut self) {
        let Some(rendered) = self.window.rendered() else {
            return;
        };
        let Some(paging) = self.paging.as_mut() else {
            return;
        };
        let mut rows = rendered
            .positions()
            .filter_map(|p| self.display.get(p).and_then(|item| item.as_row()));
        let Some(first) = rows.next() else {
            return;
        };
        let last = rows.last().unwrap_or(first);
        let cached = self.store.rows();
        let request = paging.trigger_cache_update(
            first.get(),
            last.get(),
            cached.len(),
            self.store.bounds(),
            cached.first().map(|r| &r.id),
            cached.last().map(|r| &r.id),
        );
        if let Some(request) = request {
            self.dispatch(request);
        }
    }

    /// Send `request` to the page source and tell subscribers.
    pub(super) fn dispatch(&mut self, request: PageRequest) {
        self.events.emit(ListEvent::PageRequested(request.clone()));
        match self.page_source.as_mut() {
            Some(source) => source.fetch_page(&request),
            None => debug!(
                id = request.id.get(),
                "no page source attached, request left to subscribers"
            ),
        }
    }
}

#[cfg(test)]
#[path = "list_context_tests.rs"]
mod tests;
