//! Ordered row vector with an id lookup table.

use crate::model::{Row, RowId, ValidationError};
use std::collections::HashMap;

/// Rows in store order plus `RowId -> position` for saved rows.
///
/// The unsaved id is never indexed; lookups for it scan linearly and find the
/// first unsaved row.
#[derive(Debug, Clone, Default)]
pub struct RowCache {
    rows: Vec<Row>,
    positions: HashMap<RowId, usize>,
}

impl RowCache {
    /// Build from `rows`, rejecting duplicate saved ids.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateRowId`] for the first repeated id.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, ValidationError> {
        let mut positions = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.id.is_unsaved() {
                continue;
            }
            if positions.insert(row.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateRowId { id: row.id.clone() });
            }
        }
        Ok(Self { rows, positions })
    }

    /// Rows in store order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `id`.
    pub fn position(&self, id: &RowId) -> Option<usize> {
        if id.is_unsaved() {
            return self.rows.iter().position(|r| r.id.is_unsaved());
        }
        self.positions.get(id).copied()
    }

    /// Move every row out, leaving the cache empty.
    pub fn take(&mut self) -> Vec<Row> {
        self.positions.clear();
        std::mem::take(&mut self.rows)
    }

    /// Replace the rows with a permutation of what [`take`](Self::take) returned.
    pub fn restore(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.reindex_from(0);
    }

    /// Insert `row` at `position` (clamped to the end).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateRowId`] if the id is already held.
    pub fn insert(&mut self, position: usize, row: Row) -> Result<usize, ValidationError> {
        if !row.id.is_unsaved() && self.positions.contains_key(&row.id) {
            return Err(ValidationError::DuplicateRowId { id: row.id });
        }
        let position = position.min(self.rows.len());
        self.rows.insert(position, row);
        self.reindex_from(position);
        Ok(position)
    }

    /// Overwrite the row at `position`. The id may change (an unsaved row
    /// receiving its server id).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateRowId`] if the new id belongs to a
    /// different row.
    pub fn replace(&mut self, position: usize, row: Row) -> Result<(), ValidationError> {
        let Some(slot) = self.rows.get_mut(position) else {
            return Err(ValidationError::UnknownRow { id: row.id });
        };
        if slot.id != row.id {
            if let Some(&other) = self.positions.get(&row.id) {
                if other != position {
                    return Err(ValidationError::DuplicateRowId { id: row.id });
                }
            }
            if !slot.id.is_unsaved() {
                self.positions.remove(&slot.id);
            }
            if !row.id.is_unsaved() {
                self.positions.insert(row.id.clone(), position);
            }
        }
        *slot = row;
        Ok(())
    }

    /// Remove and return the row at `position`.
    pub fn remove(&mut self, position: usize) -> Option<Row> {
        if position >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(position);
        if !row.id.is_unsaved() {
            self.positions.remove(&row.id);
        }
        self.reindex_from(position);
        Some(row)
    }

    /// Mutable access to the row at `position` for changes that keep its id.
    pub fn with_row_mut<F>(&mut self, position: usize, change: F) -> bool
    where
        F: FnOnce(&mut Row),
    {
        match self.rows.get_mut(position) {
            Some(row) => {
                let id = row.id.clone();
                change(row);
                row.id = id;
                true
            }
            None => false,
        }
    }

    /// Append rows whose ids are new; rows with known ids overwrite in place.
    ///
    /// Returns `(appended, updated)`.
    pub fn append_unique(&mut self, rows: Vec<Row>) -> (usize, usize) {
        let mut appended = 0;
        let mut updated = 0;
        for row in rows {
            match self.known_saved(&row.id) {
                Some(position) => {
                    self.rows[position] = row;
                    updated += 1;
                }
                None => {
                    if !row.id.is_unsaved() {
                        self.positions.insert(row.id.clone(), self.rows.len());
                    }
                    self.rows.push(row);
                    appended += 1;
                }
            }
        }
        (appended, updated)
    }

    /// Prepend rows whose ids are new, keeping their relative order; rows with
    /// known ids overwrite in place.
    ///
    /// Returns `(prepended, updated)`.
    pub fn prepend_unique(&mut self, rows: Vec<Row>) -> (usize, usize) {
        let mut fresh = Vec::with_capacity(rows.len());
        let mut updated = 0;
        for row in rows {
            if let Some(position) = self.known_saved(&row.id) {
                self.rows[position] = row;
                updated += 1;
            } else if let Some(dup) = fresh
                .iter_mut()
                .find(|r: &&mut Row| !row.id.is_unsaved() && r.id == row.id)
            {
                *dup = row;
                updated += 1;
            } else {
                fresh.push(row);
            }
        }
        let prepended = fresh.len();
        self.rows.splice(0..0, fresh);
        self.reindex_from(0);
        (prepended, updated)
    }

    fn known_saved(&self, id: &RowId) -> Option<usize> {
        if id.is_unsaved() {
            None
        } else {
            self.positions.get(id).copied()
        }
    }

    fn reindex_from(&mut self, start: usize) {
        if start == 0 {
            self.positions.clear();
        }
        for (i, row) in self.rows.iter().enumerate().skip(start) {
            if !row.id.is_unsaved() {
                self.positions.insert(row.id.clone(), i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, value: &str) -> Row {
        Row::new(id, [value])
    }

    #[test]
    fn from_rows_rejects_duplicates() {
        let err = RowCache::from_rows(vec![row("a", "1"), row("a", "2")]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateRowId { id: "a".into() });
    }

    #[test]
    fn multiple_unsaved_rows_are_allowed() {
        let cache = RowCache::from_rows(vec![row("", "1"), row("", "2")]).expect("no saved dups");
        assert_eq!(cache.position(&RowId::unsaved()), Some(0));
    }

    #[test]
    fn insert_shifts_positions() {
        let mut cache = RowCache::from_rows(vec![row("a", "1"), row("b", "2")]).expect("valid");
        cache.insert(0, row("c", "3")).expect("new id");
        assert_eq!(cache.position(&"a".into()), Some(1));
        assert_eq!(cache.position(&"c".into()), Some(0));
        assert!(cache.insert(0, row("b", "x")).is_err());
    }

    #[test]
    fn replace_assigns_server_id_to_unsaved_row() {
        let mut cache = RowCache::from_rows(vec![row("a", "1"), row("", "2")]).expect("valid");
        cache.replace(1, row("srv-9", "2")).expect("id is free");
        assert_eq!(cache.position(&"srv-9".into()), Some(1));
        assert_eq!(cache.position(&RowId::unsaved()), None);
    }

    #[test]
    fn replace_rejects_id_of_other_row() {
        let mut cache = RowCache::from_rows(vec![row("a", "1"), row("b", "2")]).expect("valid");
        let err = cache.replace(1, row("a", "2")).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateRowId { id: "a".into() });
    }

    #[test]
    fn remove_reindexes_tail() {
        let mut cache =
            RowCache::from_rows(vec![row("a", "1"), row("b", "2"), row("c", "3")]).expect("valid");
        let removed = cache.remove(0).expect("in range");
        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(cache.position(&"c".into()), Some(1));
        assert_eq!(cache.position(&"a".into()), None);
    }

    #[test]
    fn append_unique_updates_known_ids() {
        let mut cache = RowCache::from_rows(vec![row("a", "1")]).expect("valid");
        let (appended, updated) = cache.append_unique(vec![row("a", "new"), row("b", "2")]);
        assert_eq!((appended, updated), (1, 1));
        assert_eq!(cache.rows()[0].value(0), "new");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn prepend_unique_keeps_order() {
        let mut cache = RowCache::from_rows(vec![row("c", "3")]).expect("valid");
        let (prepended, updated) = cache.prepend_unique(vec![row("a", "1"), row("b", "2")]);
        assert_eq!((prepended, updated), (2, 0));
        let ids: Vec<&str> = cache.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(cache.position(&"c".into()), Some(2));
    }

    #[test]
    fn with_row_mut_cannot_change_id() {
        let mut cache = RowCache::from_rows(vec![row("a", "1")]).expect("valid");
        assert!(cache.with_row_mut(0, |r| {
            r.id = "z".into();
            r.extra_height = Some(4);
        }));
        assert_eq!(cache.rows()[0].id.as_str(), "a");
        assert_eq!(cache.rows()[0].extra_height, Some(4));
    }
}
