//! Typed value comparison and composed row ordering.
//!
//! A [`SortPlan`] is the composed comparator used by grouping: one key per
//! group level (outermost first), then the active sort column, then every
//! remaining column ascending. With a stable sort this fully determines the
//! row order even when only part of the ordering is configured.

use crate::model::{
    column_position, ColumnDescriptor, DataType, GroupConfig, Row, SortDirection, SortSpec,
    UnsupportedConfig,
};
use chrono::{DateTime, NaiveDate};
use std::cmp::Ordering;

/// Compare two cell values under a column data type.
///
/// Values that do not parse under a numeric, date or boolean type sort before
/// all parseable values and compare as text among themselves.
///
/// # Examples
///
/// ```
/// # use vlist::grouping::comparator::compare_values;
/// # use vlist::model::DataType;
/// use std::cmp::Ordering;
/// assert_eq!(compare_values(DataType::Number, "9", "10"), Ordering::Less);
/// assert_eq!(compare_values(DataType::Text, "9", "10"), Ordering::Greater);
/// assert_eq!(compare_values(DataType::Text, "adams", "Smith"), Ordering::Less);
/// ```
pub fn compare_values(data_type: DataType, a: &str, b: &str) -> Ordering {
    match data_type {
        DataType::Text => compare_text(a, b),
        DataType::Number => compare_parsed(a, b, parse_number),
        DataType::Date => compare_parsed(a, b, parse_date),
        DataType::Boolean => compare_parsed(a, b, parse_bool),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}

fn compare_parsed<T, F>(a: &str, b: &str, parse: F) -> Ordering
where
    T: PartialOrd,
    F: Fn(&str) -> Option<T>,
{
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => compare_text(a, b),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Milliseconds since the epoch, from RFC 3339 or a plain `YYYY-MM-DD` date.
fn parse_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Ordering on one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyComparator {
    /// Column position within the row's cells.
    pub column: usize,
    /// Comparator selector.
    pub data_type: DataType,
    /// Reverse the natural order.
    pub descending: bool,
}

impl KeyComparator {
    /// Compare two rows on this key.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ord = compare_values(self.data_type, a.value(self.column), b.value(self.column));
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Composed comparator: group levels, then sort column, then remaining columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPlan {
    keys: Vec<KeyComparator>,
    group_levels: usize,
    ordering_keys: usize,
}

impl SortPlan {
    /// Build the plan for `group_config` and the optional active sort.
    ///
    /// # Errors
    ///
    /// - [`UnsupportedConfig::UnknownColumn`] if a group level or the sort names a missing column
    /// - [`UnsupportedConfig::NotGroupable`] if a group level names a non-groupable column
    pub fn new(
        columns: &[ColumnDescriptor],
        group_config: &GroupConfig,
        sort: Option<&SortSpec>,
    ) -> Result<Self, UnsupportedConfig> {
        let mut keys = Vec::with_capacity(columns.len());
        let mut used = vec![false; columns.len()];

        for level in group_config.levels() {
            let column = column_position(columns, &level.column_id).ok_or_else(|| {
                UnsupportedConfig::UnknownColumn {
                    column: level.column_id.clone(),
                }
            })?;
            if !columns[column].groupable {
                return Err(UnsupportedConfig::NotGroupable {
                    column: level.column_id.clone(),
                });
            }
            keys.push(KeyComparator {
                column,
                data_type: columns[column].data_type,
                descending: level.reverse,
            });
            used[column] = true;
        }
        let group_levels = keys.len();

        if let Some(sort) = sort {
            let column = column_position(columns, &sort.column_id).ok_or_else(|| {
                UnsupportedConfig::UnknownColumn {
                    column: sort.column_id.clone(),
                }
            })?;
            if !used[column] {
                keys.push(KeyComparator {
                    column,
                    data_type: columns[column].data_type,
                    descending: sort.direction == SortDirection::Descending,
                });
                used[column] = true;
            }
        }
        let ordering_keys = keys.len();

        for (column, descriptor) in columns.iter().enumerate() {
            if !used[column] {
                keys.push(KeyComparator {
                    column,
                    data_type: descriptor.data_type,
                    descending: false,
                });
            }
        }

        Ok(Self {
            keys,
            group_levels,
            ordering_keys,
        })
    }

    /// Compare two rows on every key in order.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        self.keys
            .iter()
            .map(|k| k.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// The keys belonging to group levels, outermost first.
    pub fn group_keys(&self) -> &[KeyComparator] {
        &self.keys[..self.group_levels]
    }

    /// All keys in priority order.
    pub fn keys(&self) -> &[KeyComparator] {
        &self.keys
    }

    /// Columns whose change can move a row (group and sort keys).
    pub fn ordering_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.keys[..self.ordering_keys].iter().map(|k| k.column)
    }
}
