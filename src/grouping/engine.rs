//! Grouping pass and the header side table it produces.
//!
//! `group_data` sorts the rows with the composed [`SortPlan`] and then walks
//! them once, opening a new header at every level where the group key changes.
//! The result is a [`GroupPartition`]: the header list plus, per row, the
//! deepest header the row belongs to (its logical group).
//!
//! # Collapse state across regrouping
//!
//! When the new group configuration is identical to the previous one, a header
//! keeps the `collapsed` flag of the previous header with the same key path
//! (the labels from the outermost level down to it). Otherwise every header
//! starts at `collapsed_by_default`.

use super::comparator::SortPlan;
use crate::model::{
    ColumnDescriptor, GroupConfig, GroupHeader, HeaderIndex, Row, RowIndex, SortSpec,
    UnsupportedConfig, ValidationError,
};
use std::collections::HashMap;
use tracing::debug;

/// Options for a grouping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupingOptions {
    /// Initial `collapsed` flag for headers with no preserved state.
    pub collapsed_by_default: bool,
}

/// Headers produced by grouping plus each row's deepest header.
///
/// # Invariants
/// - `membership.len()` equals the row store length
/// - every `Some(h)` in `membership` is `< headers.len()`
/// - parents are strictly one level shallower, so ancestor walks terminate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupPartition {
    headers: Vec<GroupHeader>,
    membership: Vec<Option<HeaderIndex>>,
    config: GroupConfig,
}

impl GroupPartition {
    /// No grouping over `row_count` rows.
    pub fn ungrouped(row_count: usize) -> Self {
        Self {
            headers: Vec::new(),
            membership: vec![None; row_count],
            config: GroupConfig::none(),
        }
    }

    /// Adopt externally supplied headers after validating them.
    ///
    /// # Errors
    ///
    /// See [`validate_headers`].
    pub fn from_external(
        headers: Vec<GroupHeader>,
        membership: Vec<Option<HeaderIndex>>,
        config: GroupConfig,
    ) -> Result<Self, ValidationError> {
        validate_headers(&headers, &membership, config.depth())?;
        Ok(Self {
            headers,
            membership,
            config,
        })
    }

    /// Headers in creation order.
    pub fn headers(&self) -> &[GroupHeader] {
        &self.headers
    }

    /// Header at `index`.
    pub fn header(&self, index: HeaderIndex) -> Option<&GroupHeader> {
        self.headers.get(index.get())
    }

    /// Deepest header per row.
    pub fn membership(&self) -> &[Option<HeaderIndex>] {
        &self.membership
    }

    /// Deepest header of `row` (its logical group).
    pub fn logical_group(&self, row: RowIndex) -> Option<HeaderIndex> {
        self.membership.get(row.get()).copied().flatten()
    }

    /// Group configuration the headers were built for.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// True when any headers exist.
    pub fn is_grouped(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Header chain from the outermost ancestor down to `header` (inclusive).
    pub fn path(&self, header: HeaderIndex) -> Vec<HeaderIndex> {
        let mut chain = Vec::new();
        let mut cursor = Some(header);
        while let Some(h) = cursor {
            chain.push(h);
            cursor = self.headers.get(h.get()).and_then(|hd| hd.parent);
        }
        chain.reverse();
        chain
    }

    /// True when `row` is hidden by a collapsed header in its chain.
    pub fn is_row_hidden(&self, row: RowIndex) -> bool {
        let mut cursor = self.logical_group(row);
        while let Some(h) = cursor {
            let Some(header) = self.headers.get(h.get()) else {
                return false;
            };
            if header.collapsed {
                return true;
            }
            cursor = header.parent;
        }
        false
    }

    /// Flip `collapsed` on a header. Returns the new state.
    pub fn toggle_collapsed(&mut self, header: HeaderIndex) -> Option<bool> {
        let h = self.headers.get_mut(header.get())?;
        h.collapsed = !h.collapsed;
        Some(h.collapsed)
    }

    /// Set `collapsed` on a header. Returns true if the flag changed.
    pub fn set_collapsed(&mut self, header: HeaderIndex, collapsed: bool) -> bool {
        match self.headers.get_mut(header.get()) {
            Some(h) if h.collapsed != collapsed => {
                h.collapsed = collapsed;
                true
            }
            _ => false,
        }
    }

    /// Set `collapsed` on every header. Returns true if any flag changed.
    pub fn set_all_collapsed(&mut self, collapsed: bool) -> bool {
        let mut changed = false;
        for h in &mut self.headers {
            changed |= h.collapsed != collapsed;
            h.collapsed = collapsed;
        }
        changed
    }

    /// Expand every collapsed ancestor of `row`. Returns true if any changed.
    pub fn expand_ancestors(&mut self, row: RowIndex) -> bool {
        let mut changed = false;
        let mut cursor = self.logical_group(row);
        while let Some(h) = cursor {
            let Some(header) = self.headers.get_mut(h.get()) else {
                break;
            };
            changed |= header.collapsed;
            header.collapsed = false;
            cursor = header.parent;
        }
        changed
    }

    /// Track a row inserted at `position` without regrouping. The row joins
    /// `group` and every header on its chain counts it.
    pub fn insert_row(&mut self, position: usize, group: Option<HeaderIndex>) {
        let position = position.min(self.membership.len());
        let group = group.filter(|h| h.get() < self.headers.len());
        self.membership.insert(position, group);
        self.adjust_counts(group, |n| n + 1);
    }

    /// Track a row removed at `position` without regrouping.
    pub fn remove_row(&mut self, position: usize) {
        if position < self.membership.len() {
            let group = self.membership.remove(position);
            self.adjust_counts(group, |n| n.saturating_sub(1));
        }
    }

    /// Track rows appended at the tail.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DanglingRowHeader`] if a group is out of range; the
    /// partition is unchanged on error.
    pub fn append_rows(&mut self, groups: Vec<Option<HeaderIndex>>) -> Result<(), ValidationError> {
        self.check_membership(&groups, self.membership.len())?;
        for group in groups {
            self.membership.push(group);
            self.adjust_counts(group, |n| n + 1);
        }
        Ok(())
    }

    /// Track rows inserted at the head, in their final order.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DanglingRowHeader`] if a group is out of range; the
    /// partition is unchanged on error.
    pub fn prepend_rows(&mut self, groups: Vec<Option<HeaderIndex>>) -> Result<(), ValidationError> {
        self.check_membership(&groups, 0)?;
        for group in &groups {
            self.adjust_counts(*group, |n| n + 1);
        }
        self.membership.splice(0..0, groups);
        Ok(())
    }

    /// Labels from the outermost ancestor down to `header`.
    pub fn key_path(&self, header: HeaderIndex) -> Vec<&str> {
        self.path(header)
            .into_iter()
            .filter_map(|h| self.headers.get(h.get()).map(|hd| hd.item.as_str()))
            .collect()
    }

    /// Header whose key path equals `labels`.
    pub fn find_by_key_path<S: AsRef<str>>(&self, labels: &[S]) -> Option<HeaderIndex> {
        (0..self.headers.len()).map(HeaderIndex::new).find(|h| {
            let path = self.key_path(*h);
            path.len() == labels.len() && path.iter().zip(labels).all(|(a, b)| *a == b.as_ref())
        })
    }

    /// Check that every group in `groups` names an existing header. Row
    /// numbers in the error start at `first_row`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DanglingRowHeader`] for the first offending row.
    pub fn check_membership(
        &self,
        groups: &[Option<HeaderIndex>],
        first_row: usize,
    ) -> Result<(), ValidationError> {
        for (offset, group) in groups.iter().enumerate() {
            if let Some(h) = group {
                if h.get() >= self.headers.len() {
                    return Err(ValidationError::DanglingRowHeader {
                        row: first_row + offset,
                        header: h.get() as i64,
                    });
                }
            }
        }
        Ok(())
    }

    fn adjust_counts(&mut self, group: Option<HeaderIndex>, change: impl Fn(usize) -> usize) {
        let mut cursor = group;
        while let Some(h) = cursor {
            let Some(header) = self.headers.get_mut(h.get()) else {
                break;
            };
            header.item_count = change(header.item_count);
            cursor = header.parent;
        }
    }
}

/// Sort `rows` and partition them into headers.
///
/// `previous` is the partition from the last pass; its collapse state is
/// carried over when the configuration is unchanged.
///
/// # Errors
///
/// Returns [`UnsupportedConfig`] when a group level or the sort references an
/// unknown column, or a group level references a non-groupable column. `rows`
/// is left untouched in that case.
pub fn group_data(
    rows: &mut [Row],
    columns: &[ColumnDescriptor],
    config: &GroupConfig,
    sort: Option<&SortSpec>,
    options: GroupingOptions,
    previous: Option<&GroupPartition>,
) -> Result<GroupPartition, UnsupportedConfig> {
    let plan = SortPlan::new(columns, config, sort)?;
    rows.sort_by(|a, b| plan.compare(a, b));
    Ok(partition(rows, &plan, config, options, previous))
}

fn partition(
    rows: &[Row],
    plan: &SortPlan,
    config: &GroupConfig,
    options: GroupingOptions,
    previous: Option<&GroupPartition>,
) -> GroupPartition {
    let keys = plan.group_keys();
    let depth = keys.len();
    if depth == 0 {
        return GroupPartition::ungrouped(rows.len());
    }

    let mut headers: Vec<GroupHeader> = Vec::new();
    let mut membership = Vec::with_capacity(rows.len());
    // Open header per level for the current run of rows.
    let mut open: Vec<usize> = Vec::with_capacity(depth);

    for (i, row) in rows.iter().enumerate() {
        let break_level = match i {
            0 => 0,
            _ => keys
                .iter()
                .position(|k| k.compare(&rows[i - 1], row).is_ne())
                .unwrap_or(depth),
        };

        for &h in &open[..break_level] {
            headers[h].item_count += 1;
        }
        open.truncate(break_level);

        for (level, key) in keys.iter().enumerate().skip(break_level) {
            headers.push(GroupHeader {
                group_index: level,
                parent: open.last().map(|&p| HeaderIndex::new(p)),
                item: row.value(key.column).to_string(),
                item_count: 1,
                total: None,
                collapsed: options.collapsed_by_default,
            });
            open.push(headers.len() - 1);
        }

        membership.push(open.last().map(|&h| HeaderIndex::new(h)));
    }

    let mut result = GroupPartition {
        headers,
        membership,
        config: config.clone(),
    };

    if let Some(prev) = previous.filter(|p| &p.config == config && p.is_grouped()) {
        carry_collapse_state(prev, &mut result);
    }

    debug!(
        rows = rows.len(),
        headers = result.headers.len(),
        levels = depth,
        "grouping pass complete"
    );
    result
}

fn carry_collapse_state(previous: &GroupPartition, next: &mut GroupPartition) {
    let states: HashMap<Vec<&str>, bool> = (0..previous.headers.len())
        .map(|i| {
            let h = HeaderIndex::new(i);
            (previous.key_path(h), previous.headers[i].collapsed)
        })
        .collect();

    let carried: Vec<Option<bool>> = (0..next.headers.len())
        .map(|i| states.get(&next.key_path(HeaderIndex::new(i))).copied())
        .collect();

    for (header, state) in next.headers.iter_mut().zip(carried) {
        if let Some(collapsed) = state {
            header.collapsed = collapsed;
        }
    }
}

/// Validate externally supplied headers and row membership.
///
/// # Errors
///
/// - [`ValidationError::UnknownGroupLevel`] if a header's level has no config entry
/// - [`ValidationError::HeaderSelfParent`] if a header is its own parent
/// - [`ValidationError::DanglingParent`] if a parent index is out of range
/// - [`ValidationError::HeaderCycle`] if following parents loops
/// - [`ValidationError::ParentLevelMismatch`] if a parent is not one level up, or a
///   top-level header has a parent
/// - [`ValidationError::DanglingRowHeader`] if a row points past the header list
pub fn validate_headers(
    headers: &[GroupHeader],
    membership: &[Option<HeaderIndex>],
    levels: usize,
) -> Result<(), ValidationError> {
    for (i, header) in headers.iter().enumerate() {
        if header.group_index >= levels {
            return Err(ValidationError::UnknownGroupLevel {
                header: i,
                group_index: header.group_index,
                levels,
            });
        }
        if let Some(parent) = header.parent {
            if parent.get() == i {
                return Err(ValidationError::HeaderSelfParent { header: i });
            }
            if parent.get() >= headers.len() {
                return Err(ValidationError::DanglingParent {
                    header: i,
                    parent: parent.get() as i64,
                });
            }
        }
    }

    for start in 0..headers.len() {
        let mut cursor = headers[start].parent;
        let mut steps = 0;
        while let Some(p) = cursor {
            steps += 1;
            if steps > headers.len() {
                return Err(ValidationError::HeaderCycle { header: start });
            }
            cursor = headers[p.get()].parent;
        }
    }

    for (i, header) in headers.iter().enumerate() {
        match header.parent {
            Some(p) if headers[p.get()].group_index + 1 != header.group_index => {
                return Err(ValidationError::ParentLevelMismatch {
                    header: i,
                    level: header.group_index,
                    parent_level: headers[p.get()].group_index,
                });
            }
            None if header.group_index != 0 => {
                return Err(ValidationError::ParentLevelMismatch {
                    header: i,
                    level: header.group_index,
                    parent_level: 0,
                });
            }
            _ => {}
        }
    }

    for (row, group) in membership.iter().enumerate() {
        if let Some(h) = group {
            if h.get() >= headers.len() {
                return Err(ValidationError::DanglingRowHeader {
                    row,
                    header: h.get() as i64,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnId, DataType, GroupLevel};

    fn col(id: &str) -> ColumnId {
        ColumnId::new(id).expect("valid column id")
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::text(col("city")),
            ColumnDescriptor::text(col("dept")),
            ColumnDescriptor::typed(col("n"), DataType::Number),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new("1", ["Oslo", "Sales", "3"]),
            Row::new("2", ["Bergen", "Ops", "1"]),
            Row::new("3", ["Oslo", "Ops", "2"]),
            Row::new("4", ["Oslo", "Sales", "1"]),
            Row::new("5", ["Bergen", "Ops", "2"]),
        ]
    }

    fn by(ids: &[&str]) -> GroupConfig {
        GroupConfig::new(ids.iter().map(|id| GroupLevel::new(col(id))).collect())
    }

    fn header(group_index: usize, parent: Option<usize>, item: &str) -> GroupHeader {
        GroupHeader {
            group_index,
            parent: parent.map(HeaderIndex::new),
            item: item.to_string(),
            item_count: 0,
            total: None,
            collapsed: false,
        }
    }

    #[test]
    fn empty_config_sorts_but_does_not_group() {
        let mut rows = rows();
        let partition = group_data(
            &mut rows,
            &columns(),
            &GroupConfig::none(),
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        assert!(!partition.is_grouped());
        assert_eq!(partition.membership().len(), 5);
        // Fallback ordering: city, dept, n.
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "5", "3", "4", "1"]);
    }

    #[test]
    fn single_level_groups_and_counts() {
        let mut rows = rows();
        let partition = group_data(
            &mut rows,
            &columns(),
            &by(&["city"]),
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        let labels: Vec<(&str, usize)> = partition
            .headers()
            .iter()
            .map(|h| (h.item.as_str(), h.item_count))
            .collect();
        assert_eq!(labels, vec![("Bergen", 2), ("Oslo", 3)]);
        assert_eq!(partition.logical_group(RowIndex::new(0)), Some(HeaderIndex::new(0)));
        assert_eq!(partition.logical_group(RowIndex::new(4)), Some(HeaderIndex::new(1)));
    }

    #[test]
    fn outer_break_opens_new_inner_headers() {
        let mut rows = rows();
        let partition = group_data(
            &mut rows,
            &columns(),
            &by(&["city", "dept"]),
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        // Bergen > Ops(2), Oslo > Ops(1), Oslo > Sales(2)
        let shape: Vec<(usize, Option<usize>, &str, usize)> = partition
            .headers()
            .iter()
            .map(|h| (h.group_index, h.parent.map(|p| p.get()), h.item.as_str(), h.item_count))
            .collect();
        assert_eq!(
            shape,
            vec![
                (0, None, "Bergen", 2),
                (1, Some(0), "Ops", 2),
                (0, None, "Oslo", 3),
                (1, Some(2), "Ops", 1),
                (1, Some(2), "Sales", 2),
            ]
        );
        // Every row records the deepest header.
        for group in partition.membership() {
            let h = group.expect("grouped row");
            assert_eq!(partition.headers()[h.get()].group_index, 1);
        }
    }

    #[test]
    fn reversed_level_orders_groups_descending() {
        let mut rows = rows();
        let config = GroupConfig::new(vec![GroupLevel::new(col("city")).reversed()]);
        let partition = group_data(
            &mut rows,
            &columns(),
            &config,
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        assert_eq!(partition.headers()[0].item, "Oslo");
    }

    #[test]
    fn collapsed_by_default_applies_to_new_headers() {
        let mut rows = rows();
        let partition = group_data(
            &mut rows,
            &columns(),
            &by(&["city"]),
            None,
            GroupingOptions {
                collapsed_by_default: true,
            },
            None,
        )
        .expect("valid config");
        assert!(partition.headers().iter().all(|h| h.collapsed));
    }

    #[test]
    fn identical_config_preserves_collapse_state() {
        let mut rows = rows();
        let config = by(&["city"]);
        let mut first = group_data(
            &mut rows,
            &columns(),
            &config,
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        first.set_collapsed(HeaderIndex::new(1), true); // Oslo

        rows.push(Row::new("6", ["Aalesund", "Ops", "1"]));
        let second = group_data(
            &mut rows,
            &columns(),
            &config,
            Some(&SortSpec::ascending(col("n"))),
            GroupingOptions::default(),
            Some(&first),
        )
        .expect("valid config");
        let collapsed: Vec<(&str, bool)> = second
            .headers()
            .iter()
            .map(|h| (h.item.as_str(), h.collapsed))
            .collect();
        assert_eq!(
            collapsed,
            vec![("Aalesund", false), ("Bergen", false), ("Oslo", true)]
        );
    }

    #[test]
    fn changed_config_resets_collapse_state() {
        let mut rows = rows();
        let mut first = group_data(
            &mut rows,
            &columns(),
            &by(&["city"]),
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        first.set_all_collapsed(true);
        let second = group_data(
            &mut rows,
            &columns(),
            &by(&["city", "dept"]),
            None,
            GroupingOptions::default(),
            Some(&first),
        )
        .expect("valid config");
        assert!(second.headers().iter().all(|h| !h.collapsed));
    }

    #[test]
    fn hidden_rows_follow_ancestor_collapse() {
        let mut rows = rows();
        let mut partition = group_data(
            &mut rows,
            &columns(),
            &by(&["city", "dept"]),
            None,
            GroupingOptions::default(),
            None,
        )
        .expect("valid config");
        partition.set_collapsed(HeaderIndex::new(2), true); // Oslo
        assert!(!partition.is_row_hidden(RowIndex::new(0)));
        assert!(partition.is_row_hidden(RowIndex::new(2)));

        assert!(partition.expand_ancestors(RowIndex::new(2)));
        assert!(!partition.is_row_hidden(RowIndex::new(2)));
        assert!(!partition.expand_ancestors(RowIndex::new(2)));
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut partition = GroupPartition::from_external(
            vec![header(0, None, "a")],
            vec![Some(HeaderIndex::new(0))],
            by(&["city"]),
        )
        .expect("valid headers");
        assert_eq!(partition.toggle_collapsed(HeaderIndex::new(0)), Some(true));
        assert_eq!(partition.toggle_collapsed(HeaderIndex::new(0)), Some(false));
        assert_eq!(partition.toggle_collapsed(HeaderIndex::new(9)), None);
    }

    #[test]
    fn path_walks_outermost_first() {
        let partition = GroupPartition::from_external(
            vec![header(0, None, "a"), header(1, Some(0), "b")],
            vec![Some(HeaderIndex::new(1))],
            by(&["city", "dept"]),
        )
        .expect("valid headers");
        assert_eq!(
            partition.path(HeaderIndex::new(1)),
            vec![HeaderIndex::new(0), HeaderIndex::new(1)]
        );
    }

    #[test]
    fn rejects_self_parent() {
        let err = validate_headers(&[header(0, Some(0), "a")], &[], 1).unwrap_err();
        assert_eq!(err, ValidationError::HeaderSelfParent { header: 0 });
    }

    #[test]
    fn rejects_dangling_parent() {
        let err = validate_headers(&[header(1, Some(5), "a")], &[], 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DanglingParent {
                header: 0,
                parent: 5
            }
        );
    }

    #[test]
    fn rejects_parent_cycle() {
        // 0 -> 1 -> 0 without self-parenting.
        let headers = [header(1, Some(1), "a"), header(1, Some(0), "b")];
        let err = validate_headers(&headers, &[], 2).unwrap_err();
        assert_eq!(err, ValidationError::HeaderCycle { header: 0 });
    }

    #[test]
    fn rejects_group_index_without_config_entry() {
        let err = validate_headers(&[header(2, None, "a")], &[], 1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownGroupLevel {
                header: 0,
                group_index: 2,
                levels: 1
            }
        );
    }

    #[test]
    fn rejects_parent_at_wrong_level() {
        let headers = [header(0, None, "a"), header(2, Some(0), "b")];
        let err = validate_headers(&headers, &[], 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ParentLevelMismatch {
                header: 1,
                level: 2,
                parent_level: 0
            }
        );
    }

    #[test]
    fn rejects_row_with_missing_header() {
        let err =
            validate_headers(&[header(0, None, "a")], &[None, Some(HeaderIndex::new(3))], 1)
                .unwrap_err();
        assert_eq!(err, ValidationError::DanglingRowHeader { row: 1, header: 3 });
    }

    #[test]
    fn membership_tracks_ungrouped_mutations() {
        let mut partition = GroupPartition::ungrouped(2);
        partition.insert_row(2, None);
        partition.prepend_rows(vec![None; 3]).expect("no groups to check");
        partition.remove_row(0);
        assert_eq!(partition.membership().len(), 5);
    }

    #[test]
    fn incremental_rows_update_item_counts_along_chain() {
        let mut partition = GroupPartition::from_external(
            vec![header(0, None, "a"), header(1, Some(0), "b")],
            vec![Some(HeaderIndex::new(1))],
            by(&["city", "dept"]),
        )
        .expect("valid headers");
        partition
            .append_rows(vec![Some(HeaderIndex::new(1)), None])
            .expect("known header");
        assert_eq!(partition.headers()[0].item_count, 2);
        assert_eq!(partition.headers()[1].item_count, 2);

        partition.remove_row(0);
        assert_eq!(partition.headers()[0].item_count, 1);
    }

    #[test]
    fn appending_rows_with_unknown_header_fails_cleanly() {
        let mut partition = GroupPartition::ungrouped(1);
        let err = partition
            .append_rows(vec![None, Some(HeaderIndex::new(0))])
            .unwrap_err();
        assert_eq!(err, ValidationError::DanglingRowHeader { row: 2, header: 0 });
        assert_eq!(partition.membership().len(), 1);
    }

    #[test]
    fn find_by_key_path_matches_chain_labels() {
        let partition = GroupPartition::from_external(
            vec![header(0, None, "a"), header(1, Some(0), "b")],
            vec![Some(HeaderIndex::new(1))],
            by(&["city", "dept"]),
        )
        .expect("valid headers");
        assert_eq!(
            partition.find_by_key_path(&["a", "b"]),
            Some(HeaderIndex::new(1))
        );
        assert_eq!(partition.find_by_key_path(&["b"]), None);
    }
}
