//! Page requests and responses exchanged with the remote page source.
//!
//! Responses arrive as untyped JSON. [`PageResponse::from_json`] checks the
//! structure first (object, `rows` list, optional `groupHeaders` and `groups`
//! lists) and only then deserializes, so a malformed response fails with a
//! precise [`ValidationError`] instead of being partially applied.

use super::error::ValidationError;
use super::group::{GroupConfig, GroupHeader, GroupLevel};
use super::identifiers::{HeaderIndex, RowId};
use super::row::{Cell, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which page to fetch relative to the cached window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    /// Jump to the head of the server-side set, replacing the cache.
    First,
    /// Rows immediately before the cache head.
    Prev,
    /// Rows immediately after the cache tail.
    Next,
    /// Jump to the tail of the server-side set, replacing the cache.
    Last,
}

impl PageDirection {
    /// True for `First`/`Last`, which replace the whole cache.
    pub fn is_jump(&self) -> bool {
        matches!(self, Self::First | Self::Last)
    }
}

impl fmt::Display for PageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
        };
        f.write_str(name)
    }
}

/// Identity of one page request. Monotonic per list instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A page request handed to the page source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Identity the host echoes back on completion.
    pub id: RequestId,
    /// Requested page.
    pub direction: PageDirection,
    /// Row the page is adjacent to (tail for `Next`, head for `Prev`).
    pub anchor: Option<RowId>,
    /// Preferred number of rows.
    pub page_size: usize,
}

/// A validated page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Rows in the order the server sent them.
    pub rows: Vec<Row>,
    /// Deepest group header of each row, aligned with `rows`.
    pub membership: Vec<Option<HeaderIndex>>,
    /// The page starts the server-side set.
    pub is_first: bool,
    /// The page ends the server-side set.
    pub is_last: bool,
    /// Server-computed group headers, if the server groups.
    pub group_headers: Option<Vec<GroupHeader>>,
    /// Grouping the server applied, if any.
    pub groups: Option<GroupConfig>,
}

impl PageResponse {
    /// Ungrouped page.
    pub fn rows(rows: Vec<Row>, is_first: bool, is_last: bool) -> Self {
        let membership = vec![None; rows.len()];
        Self {
            rows,
            membership,
            is_first,
            is_last,
            group_headers: None,
            groups: None,
        }
    }

    /// Validate the structure of `value` and convert it.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NotAnObject`] if `value` is not an object
    /// - [`ValidationError::MissingField`] if `rows` is absent
    /// - [`ValidationError::NotAList`] if `rows`, `groupHeaders` or `groups` is not a list
    /// - [`ValidationError::MalformedResponse`] if a row or header does not deserialize
    /// - [`ValidationError::DanglingParent`] / [`ValidationError::DanglingRowHeader`] for
    ///   negative indices other than the `-1` "none" marker
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        match object.get("rows") {
            None => return Err(ValidationError::MissingField { field: "rows" }),
            Some(rows) if !rows.is_array() => {
                return Err(ValidationError::NotAList { field: "rows" })
            }
            Some(_) => {}
        }
        for field in ["groupHeaders", "groups"] {
            if let Some(v) = object.get(field) {
                if !v.is_null() && !v.is_array() {
                    return Err(ValidationError::NotAList { field });
                }
            }
        }

        let wire = WireResponse::deserialize(value).map_err(|e| {
            ValidationError::MalformedResponse {
                message: e.to_string(),
            }
        })?;
        wire.into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    rows: Vec<WireRow>,
    #[serde(default)]
    is_first: bool,
    #[serde(default)]
    is_last: bool,
    #[serde(default)]
    group_headers: Option<Vec<WireHeader>>,
    #[serde(default)]
    groups: Option<Vec<GroupLevel>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRow {
    #[serde(default)]
    id: RowId,
    #[serde(default)]
    cells: Vec<Cell>,
    #[serde(default)]
    extra_height: Option<u32>,
    #[serde(default = "no_index")]
    group_header_index: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireHeader {
    group_index: usize,
    #[serde(default = "no_index")]
    parent_header_index: i64,
    #[serde(default)]
    item: String,
    #[serde(default)]
    item_count: usize,
    #[serde(default)]
    total: Option<String>,
    #[serde(default)]
    collapsed: bool,
}

fn no_index() -> i64 {
    -1
}

impl WireResponse {
    fn into_response(self) -> Result<PageResponse, ValidationError> {
        let mut rows = Vec::with_capacity(self.rows.len());
        let mut membership = Vec::with_capacity(self.rows.len());
        for (position, wire) in self.rows.into_iter().enumerate() {
            membership.push(optional_index(wire.group_header_index).ok_or(
                ValidationError::DanglingRowHeader {
                    row: position,
                    header: wire.group_header_index,
                },
            )?);
            rows.push(Row {
                id: wire.id,
                cells: wire.cells,
                extra_height: wire.extra_height,
            });
        }

        let group_headers = match self.group_headers {
            None => None,
            Some(headers) => Some(
                headers
                    .into_iter()
                    .enumerate()
                    .map(|(index, h)| {
                        let parent = optional_index(h.parent_header_index).ok_or(
                            ValidationError::DanglingParent {
                                header: index,
                                parent: h.parent_header_index,
                            },
                        )?;
                        Ok(GroupHeader {
                            group_index: h.group_index,
                            parent,
                            item: h.item,
                            item_count: h.item_count,
                            total: h.total,
                            collapsed: h.collapsed,
                        })
                    })
                    .collect::<Result<Vec<_>, ValidationError>>()?,
            ),
        };

        Ok(PageResponse {
            rows,
            membership,
            is_first: self.is_first,
            is_last: self.is_last,
            group_headers,
            groups: self.groups.map(GroupConfig::new),
        })
    }
}

/// `-1` means "none"; other negatives are invalid (`None` returned).
fn optional_index(raw: i64) -> Option<Option<HeaderIndex>> {
    match raw {
        -1 => Some(None),
        n if n >= 0 => Some(Some(HeaderIndex::new(n as usize))),
        _ => None,
    }
}
