//! Serialized grouping plus column layout, tied to a column signature.

use super::{LayoutStorage, StorageError};
use crate::model::{ColumnId, GroupConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-column presentation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    /// Column.
    pub column_id: ColumnId,
    /// Width in pixels, if the user resized it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Column hidden by the user.
    #[serde(default)]
    pub hidden: bool,
}

/// What a list persists between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    /// Column signature the layout was saved for.
    pub signature: String,
    /// Active grouping.
    #[serde(default)]
    pub group_config: GroupConfig,
    /// Column order and sizes.
    #[serde(default)]
    pub columns: Vec<ColumnLayout>,
}

/// Serialize and store `layout` under `name`.
///
/// # Errors
///
/// Propagates backend and encoding failures; callers log and continue.
pub fn save_layout(
    storage: &mut dyn LayoutStorage,
    name: &str,
    layout: &PersistedLayout,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(layout)?;
    storage.set(name, json)
}

/// Stored layout for `name`, if one exists, decodes, and matches `signature`.
///
/// Every failure is logged and reported as "no stored layout".
pub fn load_layout(
    storage: &dyn LayoutStorage,
    name: &str,
    signature: &str,
) -> Option<PersistedLayout> {
    let raw = match storage.get(name) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(storage = name, error = %e, "layout unreadable, using defaults");
            return None;
        }
    };
    let layout: PersistedLayout = match serde_json::from_str(&raw) {
        Ok(layout) => layout,
        Err(e) => {
            warn!(storage = name, error = %e, "stored layout is corrupt, using defaults");
            return None;
        }
    };
    if layout.signature != signature {
        warn!(
            storage = name,
            stored = %layout.signature,
            expected = %signature,
            "stored layout was saved for different columns, using defaults"
        );
        return None;
    }
    Some(layout)
}
