//! Column descriptors.

use super::identifiers::ColumnId;
use serde::{Deserialize, Serialize};

/// Declared data type of a column. Selects the comparator used for sorting
/// and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Case-insensitive text, ties broken case-sensitively.
    #[default]
    Text,
    /// Decimal numbers. Unparseable values sort before all numbers.
    Number,
    /// Dates (`YYYY-MM-DD`) or RFC 3339 timestamps.
    Date,
    /// `true`/`false`; false sorts first.
    Boolean,
}

/// Describes one column of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Column identity, referenced by group and sort configuration.
    pub column_id: ColumnId,
    /// Comparator selector.
    #[serde(default)]
    pub data_type: DataType,
    /// Whether rows may be grouped by this column.
    #[serde(default = "default_groupable")]
    pub groupable: bool,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
}

fn default_groupable() -> bool {
    true
}

impl ColumnDescriptor {
    /// Groupable text column labelled with its id.
    pub fn text(column_id: ColumnId) -> Self {
        Self::typed(column_id, DataType::Text)
    }

    /// Groupable column of the given type labelled with its id.
    pub fn typed(column_id: ColumnId, data_type: DataType) -> Self {
        let label = column_id.as_str().to_string();
        Self {
            column_id,
            data_type,
            groupable: true,
            label,
        }
    }
}

/// Position of `column_id` within `columns`.
pub fn column_position(columns: &[ColumnDescriptor], column_id: &ColumnId) -> Option<usize> {
    columns.iter().position(|c| &c.column_id == column_id)
}

/// Signature identifying a column set, used to reject persisted layouts
/// written for a different set of columns.
pub fn column_signature(columns: &[ColumnDescriptor]) -> String {
    columns
        .iter()
        .map(|c| c.column_id.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(id: &str) -> ColumnId {
        ColumnId::new(id).expect("valid column id")
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let json = r#"{"columnId": "city"}"#;
        let d: ColumnDescriptor = serde_json::from_str(json).expect("valid descriptor");
        assert_eq!(d.column_id, col("city"));
        assert_eq!(d.data_type, DataType::Text);
        assert!(d.groupable);
        assert_eq!(d.label, "");
    }

    #[test]
    fn descriptor_reads_data_type() {
        let json = r#"{"columnId": "age", "dataType": "number", "groupable": false}"#;
        let d: ColumnDescriptor = serde_json::from_str(json).expect("valid descriptor");
        assert_eq!(d.data_type, DataType::Number);
        assert!(!d.groupable);
    }

    #[test]
    fn column_position_finds_by_id() {
        let cols = vec![ColumnDescriptor::text(col("a")), ColumnDescriptor::text(col("b"))];
        assert_eq!(column_position(&cols, &col("b")), Some(1));
        assert_eq!(column_position(&cols, &col("z")), None);
    }

    #[test]
    fn signature_depends_on_order() {
        let ab = vec![ColumnDescriptor::text(col("a")), ColumnDescriptor::text(col("b"))];
        let ba = vec![ColumnDescriptor::text(col("b")), ColumnDescriptor::text(col("a"))];
        assert_ne!(column_signature(&ab), column_signature(&ba));
    }
}
