//! Row records.

use super::identifiers::RowId;
use serde::{Deserialize, Serialize};

/// One cell of a row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Display value; interpreted by the column's data type when compared.
    #[serde(default)]
    pub value: String,
    /// Tooltip text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Styling class passed through to the markup producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    /// Opaque per-cell options from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl Cell {
    /// Cell holding only a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// A row record as cached on the client.
///
/// Rows are plain values. Group membership, measured height and display
/// position are kept in side tables owned by the grouping engine, the height
/// cache and the display list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Row identity. Empty for the unsaved row.
    #[serde(default)]
    pub id: RowId,
    /// Cells in column order.
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Additional rendered height in pixels (e.g. an expanded detail area).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_height: Option<u32>,
}

impl Row {
    /// Row with plain-value cells.
    pub fn new<I, S>(id: impl Into<RowId>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            cells: values.into_iter().map(Cell::new).collect(),
            extra_height: None,
        }
    }

    /// Value of the cell at `column`, empty if the row is short.
    pub fn value(&self, column: usize) -> &str {
        self.cells.get(column).map(|c| c.value.as_str()).unwrap_or("")
    }

    /// Extra height in pixels (0 when unset).
    pub fn extra_height_px(&self) -> u32 {
        self.extra_height.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_returns_empty_for_missing_cell() {
        let row = Row::new("a", ["x"]);
        assert_eq!(row.value(0), "x");
        assert_eq!(row.value(3), "");
    }

    #[test]
    fn deserializes_wire_row() {
        let json = r#"{"id": "7", "cells": [{"value": "smith", "cssClass": "hot"}], "extraHeight": 12}"#;
        let row: Row = serde_json::from_str(json).expect("valid row");
        assert_eq!(row.id, RowId::new("7"));
        assert_eq!(row.cells[0].css_class.as_deref(), Some("hot"));
        assert_eq!(row.extra_height_px(), 12);
    }

    #[test]
    fn missing_id_means_unsaved() {
        let row: Row = serde_json::from_str(r#"{"cells": []}"#).expect("valid row");
        assert!(row.id.is_unsaved());
    }
}
